//! Error types for starwarden.
//!
//! - [`BoxError`] - Dynamic error returned by hooks, listeners and checks
//! - [`CheckError`] - A named step failed while an [`AnyOf`] was evaluating
//! - [`Elapsed`] - A check did not finish within its deadline
//!
//! [`AnyOf`]: crate::AnyOf

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while evaluating a chain of checks.
///
/// The evaluator never swallows a step failure: the first error aborts the
/// evaluation of that event and is returned with the name of the step.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The check returned an error.
    #[error("step `{step}` failed: {source}")]
    Failed {
        /// Name of the failing step.
        step: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// The check exceeded its deadline.
    #[error("step `{step}` timed out after {after:?}")]
    TimedOut {
        /// Name of the step that timed out.
        step: String,
        /// The deadline that was exceeded.
        after: Duration,
    },
}

impl CheckError {
    /// Attribute an error to a step, recognising deadline expiry.
    pub fn from_step(step: impl Into<String>, source: BoxError) -> Self {
        match source.downcast::<Elapsed>() {
            Ok(elapsed) => CheckError::TimedOut {
                step: step.into(),
                after: elapsed.duration(),
            },
            Err(source) => CheckError::Failed {
                step: step.into(),
                source,
            },
        }
    }

    /// Name of the step the error belongs to.
    pub fn step(&self) -> &str {
        match self {
            CheckError::Failed { step, .. } | CheckError::TimedOut { step, .. } => step,
        }
    }
}

/// Returned by deadline wrappers when the inner check takes too long.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("check did not complete within {0:?}")]
pub struct Elapsed(Duration);

impl Elapsed {
    /// Create a new elapsed error for the given deadline.
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// The deadline that was exceeded.
    pub fn duration(&self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_step_keeps_plain_errors() {
        let source: BoxError = "boom".into();
        let err = CheckError::from_step("FILTER", source);
        assert!(matches!(err, CheckError::Failed { .. }));
        assert_eq!(err.step(), "FILTER");
        assert_eq!(err.to_string(), "step `FILTER` failed: boom");
    }

    #[test]
    fn test_from_step_recognises_elapsed() {
        let source: BoxError = Box::new(Elapsed::new(Duration::from_millis(250)));
        let err = CheckError::from_step("USER-BLOCK", source);
        match err {
            CheckError::TimedOut { step, after } => {
                assert_eq!(step, "USER-BLOCK");
                assert_eq!(after, Duration::from_millis(250));
            }
            other => panic!("expected TimedOut, got {other:?}"),
        }
    }
}
