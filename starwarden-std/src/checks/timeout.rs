//! Timeout check for time-limited evaluation.
//!
//! **Note**: This module requires the `tokio` runtime.

use starwarden_core::{BoxError, Check, Elapsed, Event};
use std::time::Duration;
use tokio::time::timeout;

/// A check that wraps another check with a deadline.
///
/// If the inner check does not answer in time, evaluation fails with
/// [`Elapsed`], which the evaluator reports as a timed out step. A slow step
/// then stalls nothing but its own event.
pub struct TimeoutCheck<C> {
    inner: C,
    duration: Duration,
}

impl<C> TimeoutCheck<C> {
    /// Create a new timeout check.
    pub fn new(inner: C, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// Create a `TimeoutCheck` with the deadline given in milliseconds.
    pub fn millis(inner: C, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the configured deadline.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get a reference to the inner check.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<E: Event, C: Check<E>> Check<E> for TimeoutCheck<C> {
    type Output = C::Output;

    async fn check(&self, event: &E) -> Result<Self::Output, BoxError> {
        match timeout(self.duration, self.inner.check(event)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(Elapsed::new(self.duration))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingCheck, StallingCheck};
    use starwarden_core::{AnyOf, CheckError};

    #[test]
    fn test_timeout_check_creation() {
        let check = TimeoutCheck::millis(CountingCheck::new(false), 500);
        assert_eq!(check.duration(), Duration::from_millis(500));
        assert_eq!(check.inner().count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_trigger() {
        let check = TimeoutCheck::millis(StallingCheck::<bool>::new(), 10);
        let err = check.check(&()).await.unwrap_err();
        let elapsed = err.downcast_ref::<Elapsed>().unwrap();
        assert_eq!(elapsed.duration(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_timeout_success() {
        let check = TimeoutCheck::millis(CountingCheck::new(true), 1_000);
        assert!(check.check(&()).await.unwrap());
    }

    #[tokio::test]
    async fn test_evaluator_reports_timed_out_step() {
        let after = CountingCheck::new(true);
        let chain = AnyOf::builder()
            .step("slow", TimeoutCheck::millis(StallingCheck::<bool>::new(), 10))
            .step("after", after.clone())
            .build();

        match chain.evaluate(&()).await {
            Err(CheckError::TimedOut { step, after: deadline }) => {
                assert_eq!(step, "slow");
                assert_eq!(deadline, Duration::from_millis(10));
            }
            other => panic!("expected a timed out step, got {other:?}"),
        }
        assert_eq!(after.count(), 0);
    }
}
