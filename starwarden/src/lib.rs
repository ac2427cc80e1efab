//! # starwarden - Star Reaction Gating
//!
//! `starwarden` decides whether a star reaction on a chat message may stand.
//! A guild's configuration is compiled once into an ordered gate of named
//! steps; every star is run through the gate, and the first step that objects
//! has the reaction removed and its author warned by direct message.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use starwarden::{Catalog, config, starboard};
//! use std::{path::Path, sync::Arc};
//!
//! let config = config::load_or_write_example(Path::new("starboard.json"))?;
//! let board = starboard(&config, Arc::new(client), Arc::new(Catalog::english()));
//!
//! // For every reaction the platform delivers:
//! board.on_event(&reaction).await?;
//! ```
//!
//! ## Layout
//!
//! - [`config`]: configuration model and loading
//! - [`compiler`]: configuration to gate
//! - [`matchers`]: the gating steps
//! - [`gate`]: the event entry point
//! - [`censure`]: retraction and warning
//! - [`star_cache`]: star counts for the starboard

#![warn(missing_docs)]

pub mod censure;
pub mod compiler;
pub mod config;
pub mod error;
pub mod gate;
pub mod localize;
pub mod matchers;
pub mod platform;
pub mod star_cache;

pub use starwarden_core::{
    // Evaluation
    AnyOf,
    AnyOfBuilder,
    // Errors
    BoxError,
    Check,
    CheckError,
    Elapsed,
    Event,
    Finding,
    // Pipeline
    Handler,
    Hook,
    HookResult,
    IntoResponse,
    Listener,
    Pipeline,
    Positive,
    check_fn,
};
pub use starwarden_std::{PatternCache, PatternCompileError};

pub use censure::Censure;
pub use compiler::{Gate, RuleCompiler, compile};
pub use config::{ConfigError, GatingConfig};
pub use error::{NotificationDeliveryError, WardenError};
pub use gate::{
    Disposition, Gating, ReactionSource, Rejection, StarWarden, Starboard, starboard,
};
pub use localize::{Catalog, Localizer};
pub use matchers::{Detail, Verdict};
pub use platform::{PlatformError, ReactionAdd, ReactionClient};
pub use star_cache::{CacheError, MemoryLedger, StarCache, StarEntry, StarLedger};

/// Standard check wrappers.
pub mod checks {
    pub use starwarden_std::checks::{TimeoutCheck, TracedCheck};
}

/// Test doubles for checks.
pub mod testing {
    pub use starwarden_std::testing::{CountingCheck, FailingCheck, StallingCheck};
}

/// Prelude module - common imports for starwarden.
///
/// # Usage
///
/// ```rust,ignore
/// use starwarden::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Core traits
        Check,
        Handler,
        Hook,
        HookResult,
        Listener,
        Localizer,
        ReactionClient,
        // Gating
        Disposition,
        GatingConfig,
        ReactionAdd,
        StarWarden,
        starboard,
    };
}
