//! Testing utilities for starwarden.
//!
//! Doubles for exercising evaluators and compiled gates without real
//! predicates.
//!
//! - [`CountingCheck`]: answers a fixed value and counts invocations
//! - [`FailingCheck`]: always returns an error
//! - [`StallingCheck`]: never answers

use starwarden_core::{BoxError, Check, Event, Positive};
use std::{
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Counting Check
// ============================================================================

/// A check that answers a fixed value and counts invocations.
///
/// Clones share the counter, so keep one clone and hand the other to the
/// evaluator.
///
/// # Example
///
/// ```rust,ignore
/// let second = CountingCheck::new(true);
/// let chain = AnyOf::builder()
///     .step("first", CountingCheck::new(true))
///     .step("second", second.clone())
///     .build();
///
/// chain.evaluate(&event).await?;
/// assert_eq!(second.count(), 0);
/// ```
pub struct CountingCheck<T> {
    answer: T,
    count: Arc<AtomicUsize>,
}

impl<T> CountingCheck<T> {
    /// Create a check that always answers `answer`.
    pub fn new(answer: T) -> Self {
        Self {
            answer,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the check ran.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<T: Clone> Clone for CountingCheck<T> {
    fn clone(&self) -> Self {
        Self {
            answer: self.answer.clone(),
            count: self.count.clone(),
        }
    }
}

impl<E, T> Check<E> for CountingCheck<T>
where
    E: Event,
    T: Positive + Clone + Sync,
{
    type Output = T;

    async fn check(&self, _event: &E) -> Result<T, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

// ============================================================================
// Failing Check
// ============================================================================

/// A check that always fails with the given message.
pub struct FailingCheck<T> {
    message: String,
    _answer: PhantomData<fn() -> T>,
}

impl<T> FailingCheck<T> {
    /// Create a failing check.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            _answer: PhantomData,
        }
    }
}

impl<E: Event, T: Positive> Check<E> for FailingCheck<T> {
    type Output = T;

    async fn check(&self, _event: &E) -> Result<T, BoxError> {
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Stalling Check
// ============================================================================

/// A check that never answers. Pair it with a deadline.
pub struct StallingCheck<T>(PhantomData<fn() -> T>);

impl<T> StallingCheck<T> {
    /// Create a stalling check.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for StallingCheck<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event, T: Positive> Check<E> for StallingCheck<T> {
    type Output = T;

    async fn check(&self, _event: &E) -> Result<T, BoxError> {
        futures::future::pending().await
    }
}
