//! # Hook Layer
//!
//! The entry point a host calls for each incoming event.
//!
//! A host (the plugin runtime delivering platform events) keeps a list of
//! hooks and offers every event to them in turn. Each hook decides whether the
//! event was consumed (`Stop`) or may be offered to the next one (`Next`).
//! Several events can be in flight at once, so a hook must not keep per-event
//! state in `self`.

use crate::{error::BoxError, event::Event};
use std::future::Future;

/// Result of hook execution indicating whether to continue or stop propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// The event was observed or left alone; continue to the next hook.
    Next,
    /// The event was fully handled; stop propagation to subsequent hooks.
    Stop,
}

/// An event entry point.
///
/// This trait uses native `async fn` for static dispatch. An error aborts the
/// processing of that single event only.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook<{E}>`",
    label = "missing `Hook` implementation",
    note = "Hooks must implement `on_event` for the specific event type `{E}`."
)]
pub trait Hook<E: Event>: Send + Sync + 'static {
    /// Called when an event is delivered.
    fn on_event(&self, event: &E) -> impl Future<Output = Result<HookResult, BoxError>> + Send;
}
