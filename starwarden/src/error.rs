//! Errors raised while handling a single reaction.

use crate::platform::{PlatformError, UserId};
use starwarden_core::CheckError;
use thiserror::Error;

/// A reaction could not be handled to completion.
///
/// Only ever affects the one event; the compiled gate stays usable.
#[derive(Error, Debug)]
pub enum WardenError {
    /// A gating step failed or ran past its deadline.
    #[error(transparent)]
    Evaluation(#[from] CheckError),

    /// The rejected reaction could not be removed.
    #[error("failed to retract reaction: {0}")]
    Retract(#[source] PlatformError),
}

/// The warning to a censured user could not be delivered.
///
/// Logged and swallowed; the retraction stands.
#[derive(Error, Debug)]
#[error("failed to notify user {user}: {source}")]
pub struct NotificationDeliveryError {
    /// The user who should have been warned.
    pub user: UserId,
    /// What the platform reported.
    #[source]
    pub source: PlatformError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_notification_error_display() {
        let error = NotificationDeliveryError {
            user: UserId(42),
            source: PlatformError::DirectMessagesClosed(UserId(42)),
        };
        assert_eq!(
            error.to_string(),
            "failed to notify user 42: user 42 does not accept direct messages"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn test_evaluation_is_transparent() {
        let error = WardenError::from(CheckError::from_step("FILTER", "boom".into()));
        assert!(matches!(error, WardenError::Evaluation(_)));
        assert!(error.to_string().contains("FILTER"));
    }
}
