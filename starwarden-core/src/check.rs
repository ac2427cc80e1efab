//! # Check Layer
//!
//! A check answers one narrow question about an event: is the actor blocked,
//! is the message too old, did the author star their own message. The answer
//! is any [`Positive`] value, so a check can report a bare flag (`bool`), a
//! human readable reason (`String`) or a richer domain type.
//!
//! Checks are composed by [`AnyOf`], which keeps them behind [`DynCheck`] so
//! that checks of different concrete types can share one ordered list.
//!
//! [`AnyOf`]: crate::AnyOf

use crate::{error::BoxError, event::Event, positive::Positive};
use std::{future::Future, pin::Pin};

/// A named question asked about an event.
///
/// Errors are not findings. A check that cannot reach a decision returns
/// `Err`, and the evaluator aborts that event instead of guessing.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Check` for `{E}`",
    label = "missing `Check` implementation",
    note = "Checks must implement `check` for the event type `{E}`."
)]
pub trait Check<E: Event>: Send + Sync + 'static {
    /// The answer type. Negative answers let evaluation continue.
    type Output: Positive;

    /// Inspect the event.
    fn check(&self, event: &E) -> impl Future<Output = Result<Self::Output, BoxError>> + Send;
}

/// Object-safe version of [`Check`].
pub trait DynCheck<E: Event, T>: Send + Sync + 'static {
    /// Inspect the event (dynamic dispatch version).
    fn check_dyn<'a>(
        &'a self,
        event: &'a E,
    ) -> Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send + 'a>>;
}

impl<E: Event, C: Check<E>> DynCheck<E, C::Output> for C {
    fn check_dyn<'a>(
        &'a self,
        event: &'a E,
    ) -> Pin<Box<dyn Future<Output = Result<C::Output, BoxError>> + Send + 'a>> {
        Box::pin(self.check(event))
    }
}

/// A check backed by a synchronous closure. See [`check_fn`].
pub struct FnCheck<F>(F);

/// Wrap a synchronous closure as a [`Check`].
///
/// ```rust,ignore
/// let too_long = check_fn(|text: &String| Ok(text.len() > 2000));
/// ```
pub fn check_fn<F>(f: F) -> FnCheck<F> {
    FnCheck(f)
}

impl<E, T, F> Check<E> for FnCheck<F>
where
    E: Event,
    T: Positive,
    F: Fn(&E) -> Result<T, BoxError> + Send + Sync + 'static,
{
    type Output = T;

    async fn check(&self, event: &E) -> Result<T, BoxError> {
        (self.0)(event)
    }
}
