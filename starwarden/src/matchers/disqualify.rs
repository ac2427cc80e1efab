//! Messages that may never be starred.

use super::{Detail, Verdict};
use crate::{
    config::DisqualificationRule,
    platform::{Message, ReactionAdd},
};
use chrono::{DateTime, Utc};
use starwarden_core::{BoxError, Check};

/// Rejects stars on messages matching any disqualification rule.
pub struct BadStars {
    rules: Vec<DisqualificationRule>,
}

impl BadStars {
    /// Build the matcher over `rules`, kept in configured order.
    pub fn new(rules: Vec<DisqualificationRule>) -> Self {
        Self { rules }
    }

    /// The first rule `message` satisfies at `now`.
    pub fn first_match(&self, message: &Message, now: DateTime<Utc>) -> Option<&DisqualificationRule> {
        self.rules
            .iter()
            .find(|rule| rule_matches(rule, message, now))
    }
}

/// Whether every condition present on `rule` holds for `message`.
///
/// Conditions are tested cheapest first: age, channel, sender, content.
pub fn rule_matches(rule: &DisqualificationRule, message: &Message, now: DateTime<Utc>) -> bool {
    if let Some(minutes) = rule.aged {
        let threshold = i64::try_from(minutes.saturating_mul(60_000)).unwrap_or(i64::MAX);
        if message.age_at(now).num_milliseconds() < threshold {
            return false;
        }
    }

    if let Some(channels) = &rule.channels {
        if !channels.contains(&message.channel_id) {
            return false;
        }
    }

    if let Some(authors) = &rule.authors {
        let Some(sender) = message.sender() else {
            return false;
        };
        if !authors.iter().any(|matcher| matcher.matches(sender)) {
            return false;
        }
    }

    if let Some(content) = &rule.content {
        let Some(text) = message.content.as_deref() else {
            return false;
        };
        if !content.matches(text) {
            return false;
        }
    }

    true
}

impl Check<ReactionAdd> for BadStars {
    type Output = Verdict;

    async fn check(&self, event: &ReactionAdd) -> Result<Verdict, BoxError> {
        Ok(self
            .first_match(&event.message, event.received_at)
            .map(|rule| Detail::from_reason(rule.reason.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{AuthorMatcher, ContentMatcher},
        matchers::fixtures::{bot, epoch, message, reaction, user},
        platform::{ChannelId, UserId, WebhookId},
    };
    use chrono::TimeDelta;

    fn aged(minutes: u64) -> DisqualificationRule {
        DisqualificationRule {
            aged: Some(minutes),
            ..Default::default()
        }
    }

    fn authors(matchers: Vec<AuthorMatcher>) -> DisqualificationRule {
        DisqualificationRule {
            authors: Some(matchers),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_rule_matches_everything() {
        let msg = message(user(1, "alice"));
        assert!(rule_matches(&DisqualificationRule::default(), &msg, epoch()));
    }

    #[test]
    fn test_age_boundary() {
        let msg = message(user(1, "alice"));
        let rule = aged(1440);

        let exactly = msg.created_at + TimeDelta::minutes(1440);
        assert!(rule_matches(&rule, &msg, exactly));

        let just_under = exactly - TimeDelta::milliseconds(1);
        assert!(!rule_matches(&rule, &msg, just_under));

        assert!(rule_matches(&rule, &msg, exactly + TimeDelta::days(3)));
    }

    #[test]
    fn test_future_dated_message_is_not_old() {
        let msg = message(user(1, "alice"));
        assert!(!rule_matches(&aged(1), &msg, msg.created_at - TimeDelta::minutes(5)));
        assert!(rule_matches(&aged(0), &msg, msg.created_at));
    }

    #[test]
    fn test_huge_age_never_overflows() {
        let msg = message(user(1, "alice"));
        assert!(!rule_matches(&aged(u64::MAX), &msg, epoch()));
    }

    #[test]
    fn test_channels() {
        let msg = message(user(1, "alice"));
        let inside = DisqualificationRule {
            channels: Some(vec![ChannelId(19), ChannelId(20)]),
            ..Default::default()
        };
        let outside = DisqualificationRule {
            channels: Some(vec![ChannelId(21)]),
            ..Default::default()
        };
        assert!(rule_matches(&inside, &msg, epoch()));
        assert!(!rule_matches(&outside, &msg, epoch()));
    }

    #[test]
    fn test_author_matchers_on_accounts() {
        let by_bot = message(bot(7, "helper"));
        let by_alice = message(user(1, "alice"));

        assert!(rule_matches(&authors(vec![AuthorMatcher::Bots]), &by_bot, epoch()));
        assert!(!rule_matches(&authors(vec![AuthorMatcher::Bots]), &by_alice, epoch()));
        assert!(rule_matches(
            &authors(vec![AuthorMatcher::Account(UserId(1))]),
            &by_alice,
            epoch()
        ));
        assert!(!rule_matches(&authors(vec![AuthorMatcher::Hooks]), &by_bot, epoch()));
    }

    #[test]
    fn test_author_matchers_on_integrations() {
        let mut hooked = message(bot(7, "Deploy Notifier"));
        hooked.webhook_id = Some(WebhookId(7));

        assert!(rule_matches(&authors(vec![AuthorMatcher::Hooks]), &hooked, epoch()));
        assert!(rule_matches(
            &authors(vec![AuthorMatcher::Hook(WebhookId(7))]),
            &hooked,
            epoch()
        ));
        assert!(!rule_matches(
            &authors(vec![AuthorMatcher::Hook(WebhookId(8))]),
            &hooked,
            epoch()
        ));
        // The placeholder author shares the webhook's id; account entries must not see it.
        assert!(!rule_matches(
            &authors(vec![AuthorMatcher::Account(UserId(7)), AuthorMatcher::Bots]),
            &hooked,
            epoch()
        ));
    }

    #[test]
    fn test_unknown_author_never_matches_author_rule() {
        let mut msg = message(user(1, "alice"));
        msg.author = None;
        assert!(!rule_matches(&authors(vec![AuthorMatcher::Bots]), &msg, epoch()));
    }

    #[test]
    fn test_content_matchers() {
        let mut msg = message(user(1, "alice"));
        msg.content = Some("!rank please".into());
        let with = |content| DisqualificationRule {
            content: Some(content),
            ..Default::default()
        };

        assert!(rule_matches(&with(ContentMatcher::StartsWith("!".into())), &msg, epoch()));
        assert!(rule_matches(&with(ContentMatcher::EndsWith("please".into())), &msg, epoch()));
        assert!(rule_matches(&with(ContentMatcher::Includes("rank".into())), &msg, epoch()));
        assert!(rule_matches(&with(ContentMatcher::Equals("!rank please".into())), &msg, epoch()));
        assert!(!rule_matches(&with(ContentMatcher::Includes("RANK".into())), &msg, epoch()));

        msg.content = None;
        assert!(!rule_matches(&with(ContentMatcher::Includes("".into())), &msg, epoch()));
    }

    #[test]
    fn test_conjunction_within_rule() {
        let msg = message(bot(7, "helper"));
        let rule = DisqualificationRule {
            authors: Some(vec![AuthorMatcher::Bots]),
            channels: Some(vec![ChannelId(99)]),
            ..Default::default()
        };
        assert!(!rule_matches(&rule, &msg, epoch()));
    }

    #[tokio::test]
    async fn test_first_matching_rule_reason_wins() {
        let bad = BadStars::new(vec![
            DisqualificationRule {
                channels: Some(vec![ChannelId(99)]),
                reason: Some("first".into()),
                ..Default::default()
            },
            DisqualificationRule {
                authors: Some(vec![AuthorMatcher::Account(UserId(1))]),
                reason: Some("second".into()),
                ..Default::default()
            },
            DisqualificationRule {
                reason: Some("third".into()),
                ..Default::default()
            },
        ]);
        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        assert_eq!(
            bad.check(&event).await.unwrap(),
            Some(Detail::Reason("second".into()))
        );
    }

    #[tokio::test]
    async fn test_rule_without_reason_is_flag() {
        let bad = BadStars::new(vec![aged(0)]);
        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        assert_eq!(bad.check(&event).await.unwrap(), Some(Detail::Flagged));
    }

    #[tokio::test]
    async fn test_age_measured_at_receipt() {
        let bad = BadStars::new(vec![aged(1440)]);
        let mut event = reaction(user(2, "bob"), message(user(1, "alice")));

        event.received_at = event.message.created_at + TimeDelta::minutes(1439);
        assert_eq!(bad.check(&event).await.unwrap(), None);

        event.received_at = event.message.created_at + TimeDelta::minutes(1440);
        assert_eq!(bad.check(&event).await.unwrap(), Some(Detail::Flagged));
    }
}
