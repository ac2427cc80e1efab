//! Self-starring.

use super::{Detail, Verdict};
use crate::platform::{ReactionAdd, Sender};
use starwarden_core::{BoxError, Check};

/// Rejects stars an author puts on their own message.
///
/// Only compiled in when self-starring is disqualified. An integration post or
/// a message whose author the platform did not deliver never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfStar;

impl Check<ReactionAdd> for SelfStar {
    type Output = Verdict;

    async fn check(&self, event: &ReactionAdd) -> Result<Verdict, BoxError> {
        Ok(match event.message.sender() {
            Some(Sender::Account(author)) if author.id == event.user.id => Some(Detail::Flagged),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matchers::fixtures::{message, reaction, user},
        platform::WebhookId,
    };

    #[tokio::test]
    async fn test_own_message() {
        let alice = user(1, "alice");
        let event = reaction(alice.clone(), message(alice));
        assert_eq!(SelfStar.check(&event).await.unwrap(), Some(Detail::Flagged));
    }

    #[tokio::test]
    async fn test_someone_elses_message() {
        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        assert_eq!(SelfStar.check(&event).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unresolvable_sender() {
        let alice = user(1, "alice");
        let mut event = reaction(alice.clone(), message(alice));
        event.message.author = None;
        assert_eq!(SelfStar.check(&event).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_integration_post_sharing_the_id() {
        let alice = user(1, "alice");
        let mut event = reaction(alice.clone(), message(alice));
        event.message.webhook_id = Some(WebhookId(1));
        assert_eq!(SelfStar.check(&event).await.unwrap(), None);
    }
}
