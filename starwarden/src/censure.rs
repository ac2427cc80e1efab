//! Acting on a rejected star.

use crate::{
    error::{NotificationDeliveryError, WardenError},
    gate::Rejection,
    localize::{Localizer, keys},
    platform::{Emoji, ReactionAdd, ReactionClient},
};
use std::sync::Arc;

/// Retracts rejected stars and warns the user who placed them.
#[derive(Clone)]
pub struct Censure {
    client: Arc<dyn ReactionClient>,
    localizer: Arc<dyn Localizer>,
}

impl Censure {
    /// Act through `client`, wording warnings with `localizer`.
    pub fn new(client: Arc<dyn ReactionClient>, localizer: Arc<dyn Localizer>) -> Self {
        Self { client, localizer }
    }

    /// The warning sent for `rejection`.
    pub fn warning(&self, rejection: &Rejection, emoji: &Emoji) -> String {
        let emoji = emoji.to_string();
        match rejection.detail.reason() {
            Some(reason) => self.localizer.localize(
                keys::CENSURE_REASON,
                &[
                    ("emoji", emoji.as_str()),
                    ("step", rejection.step.as_str()),
                    ("reason", reason),
                ],
            ),
            None => self.localizer.localize(
                keys::CENSURE_STEP,
                &[("emoji", emoji.as_str()), ("step", rejection.step.as_str())],
            ),
        }
    }

    /// Remove the star, then warn its author.
    ///
    /// Returns whether the warning was delivered. A failed removal is an
    /// error and nobody is warned; a failed warning is only logged.
    pub async fn apply(&self, event: &ReactionAdd, rejection: &Rejection) -> Result<bool, WardenError> {
        self.client
            .remove_reaction(&event.message, &event.emoji, event.user.id)
            .await
            .map_err(WardenError::Retract)?;

        let warning = self.warning(rejection, &event.emoji);
        match self.client.send_direct_message(event.user.id, &warning).await {
            Ok(()) => Ok(true),
            Err(source) => {
                let error = NotificationDeliveryError {
                    user: event.user.id,
                    source,
                };
                tracing::warn!(
                    user_id = %event.user.id,
                    message_id = %event.message.id,
                    step = %rejection.step,
                    %error,
                    "star retracted but warning not delivered"
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{localize::Catalog, matchers::Detail};

    struct Unreachable;

    #[async_trait::async_trait]
    impl ReactionClient for Unreachable {
        async fn remove_reaction(
            &self,
            _: &crate::platform::Message,
            _: &Emoji,
            _: crate::platform::UserId,
        ) -> Result<(), crate::platform::PlatformError> {
            unreachable!()
        }

        async fn send_direct_message(
            &self,
            _: crate::platform::UserId,
            _: &str,
        ) -> Result<(), crate::platform::PlatformError> {
            unreachable!()
        }
    }

    fn censure() -> Censure {
        Censure::new(Arc::new(Unreachable), Arc::new(Catalog::english()))
    }

    #[test]
    fn test_warning_with_reason() {
        let rejection = Rejection {
            step: "FILTER".into(),
            detail: Detail::Reason("no starring webhook posts".into()),
        };
        assert_eq!(
            censure().warning(&rejection, &Emoji::Unicode("⭐".into())),
            "Your ⭐ on a message was removed (FILTER): no starring webhook posts"
        );
    }

    #[test]
    fn test_warning_for_flag() {
        let rejection = Rejection {
            step: "SELF-STAR".into(),
            detail: Detail::Flagged,
        };
        assert_eq!(
            censure().warning(&rejection, &Emoji::Unicode("⭐".into())),
            "Your ⭐ on a message was removed (SELF-STAR)."
        );
    }
}
