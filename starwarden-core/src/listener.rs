//! # Listener Layer
//!
//! A Listener is the gatekeeper in front of a [`Handler`]. It inspects the raw
//! event and either drops it (`Ok(None)`) or passes an owned value on.
//! Dropping is silent: the pipeline reports `Next` and the handler never runs.
//!
//! [`Handler`]: crate::Handler

use crate::{
    error::BoxError,
    event::Event,
    handler::{Handler, HandlerResult},
    hook::{Hook, HookResult},
    response::IntoResponse,
};
use std::future::Future;

/// An event gatekeeper.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener` for `{In}`",
    label = "missing `Listener` implementation",
    note = "Listeners must implement the `listen` method to process `{In}`."
)]
pub trait Listener<In: Event>: Send + Sync + 'static {
    /// The value handed to the handler when the event is accepted.
    type Output: Event;

    /// Decide whether the event concerns this listener.
    fn listen(
        &self,
        event: &In,
    ) -> impl Future<Output = Result<Option<Self::Output>, BoxError>> + Send;

    /// Connects to a handler.
    fn handler<H>(self, handler: H) -> Pipeline<Self, H>
    where
        Self: Sized,
        H: Handler<Self::Output>,
    {
        Pipeline {
            listener: self,
            handler,
        }
    }
}

/// A listener joined to a handler; usable as a [`Hook`].
pub struct Pipeline<L, H> {
    /// The gatekeeping listener.
    pub listener: L,
    /// The handler receiving accepted events.
    pub handler: H,
}

impl<L, H, In> Hook<In> for Pipeline<L, H>
where
    In: Event,
    L: Listener<In>,
    H: Handler<L::Output>,
    H::Output: HandlerResult + IntoResponse,
{
    async fn on_event(&self, event: &In) -> Result<HookResult, BoxError> {
        match self.listener.listen(event).await? {
            Some(out) => self.handler.call(out).await.into_response(),
            None => Ok(HookResult::Next),
        }
    }
}
