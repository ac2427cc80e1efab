//! # starwarden-std
//!
//! Standard implementations for the starwarden reaction gating engine.
//!
//! This crate provides:
//! - **Pattern cache**: [`PatternCache`], memoized regular expressions
//! - **Check wrappers**: [`TracedCheck`](checks::TracedCheck) and, with the
//!   `timeout` feature, [`TimeoutCheck`](checks::TimeoutCheck)
//! - **Testing doubles**: counting, failing and stalling checks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use starwarden_core;

pub mod checks;
pub mod pattern_cache;
pub mod testing;

pub use pattern_cache::{PatternCache, PatternCompileError};
