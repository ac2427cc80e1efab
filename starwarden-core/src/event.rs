//! Event trait for gated inputs.

/// A marker trait for events flowing through hooks and checks.
///
/// Events must be `Send + Sync + 'static` so that checks can hold a reference
/// to them across await points.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct ReactionAdd { user_id: u64 }
///
/// impl Event for ReactionAdd {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Event",
    label = "must be `Send + Sync + 'static`",
    note = "All events in starwarden must be thread-safe and static."
)]
pub trait Event: Send + Sync + 'static {}

impl Event for () {}
impl Event for u64 {}
