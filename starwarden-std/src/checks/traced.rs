//! Tracing instrumentation for checks.

use starwarden_core::{BoxError, Check, Event};
use std::borrow::Cow;

/// A check wrapper that records each evaluation in a `tracing` span.
///
/// With the `tracing` feature disabled this is a transparent pass-through.
pub struct TracedCheck<C> {
    inner: C,
    step: Cow<'static, str>,
}

impl<C> TracedCheck<C> {
    /// Wrap `inner`, labelling its span with the step name.
    pub fn new(inner: C, step: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner,
            step: step.into(),
        }
    }

    /// The step name used in spans.
    pub fn step(&self) -> &str {
        &self.step
    }
}

#[cfg(feature = "tracing")]
use {starwarden_core::Positive, tracing::Instrument};

impl<E: Event, C: Check<E>> Check<E> for TracedCheck<C> {
    type Output = C::Output;

    #[cfg(feature = "tracing")]
    async fn check(&self, event: &E) -> Result<Self::Output, BoxError> {
        let span = tracing::trace_span!("gating_step", step = %self.step);
        async move {
            let result = self.inner.check(event).await;
            match &result {
                Ok(answer) => tracing::trace!(positive = answer.is_positive(), "step answered"),
                Err(error) => tracing::debug!(%error, "step failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    #[cfg(not(feature = "tracing"))]
    async fn check(&self, event: &E) -> Result<Self::Output, BoxError> {
        self.inner.check(event).await
    }
}
