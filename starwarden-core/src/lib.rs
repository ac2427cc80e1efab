//! # starwarden-core
//!
//! Core traits for the starwarden reaction gating engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! hosts and extensions that don't need the standard checks in
//! `starwarden-std` or the starboard feature in `starwarden`.
//!
//! # Layers
//!
//! ## Layer 1: Hook ([`Hook`])
//!
//! The entry point a host calls for every incoming event. Receives an event,
//! returns `Next` or `Stop`.
//!
//! ## Layer 2: Listener and Handler ([`Listener`], [`Handler`])
//!
//! A Listener decides whether an event concerns it at all and hands an owned
//! copy to a Handler. Joined with [`Listener::handler`], the pair becomes a
//! [`Pipeline`], which is itself a Hook.
//!
//! ## Layer 3: Checks ([`Check`], [`AnyOf`])
//!
//! A Check answers one narrow question about an event. Its answer is any
//! [`Positive`] value: `false`, `None` or an empty string mean "nothing to
//! report", anything else is a finding. [`AnyOf`] runs named checks strictly in
//! order and stops at the first finding.
//!
//! # Error Types
//!
//! - [`BoxError`] - Error returned by hooks, listeners and checks
//! - [`CheckError`] - A step of an [`AnyOf`] failed or timed out
//! - [`Elapsed`] - Raised by deadline wrappers, recognised by [`AnyOf`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod any_of;
mod check;
mod error;
mod event;
mod handler;
mod hook;
mod listener;
mod positive;
mod response;

pub use any_of::{AnyOf, AnyOfBuilder, Finding};
pub use check::{Check, DynCheck, FnCheck, check_fn};
pub use error::{BoxError, CheckError, Elapsed};
pub use event::Event;
pub use handler::{Handler, HandlerResult};
pub use hook::{Hook, HookResult};
pub use listener::{Listener, Pipeline};
pub use positive::Positive;
pub use response::IntoResponse;
