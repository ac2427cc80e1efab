//! # Handler Layer
//!
//! The terminal point of a [`Pipeline`]: receives an owned event that a
//! [`Listener`] accepted and performs the side effects.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|event| async move { ... }`
//! 2. **Struct implementation**: `impl Handler<MyEvent> for MyHandler`
//!
//! [`Pipeline`]: crate::Pipeline
//! [`Listener`]: crate::Listener

use crate::event::Event;
use std::future::Future;

/// A marker trait for the result of an endpoint execution.
pub trait HandlerResult: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> HandlerResult for T {}

/// The terminal endpoint of an event pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle input of type `{In}`",
    label = "missing `Handler<{In}>` implementation",
    note = "Handlers must implement the `call` method for the input type `{In}`."
)]
pub trait Handler<In: Event>: Send + Sync + 'static {
    /// The output type of the handler, usually `()`, `bool` or a status enum.
    type Output: HandlerResult;

    /// Executes the handler logic.
    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send;
}

impl<F, In, Out, Fut> Handler<In> for F
where
    In: Event,
    Out: HandlerResult,
    F: Fn(In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
{
    type Output = Out;

    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send {
        (self)(input)
    }
}
