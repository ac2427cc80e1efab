//! # Rule Compiler
//!
//! Turns a [`GatingConfig`] into the ordered [`Gate`] evaluated for every
//! star. The order is fixed:
//!
//! 1. `USER-BLOCK` when `blockedStarrers` is present (even if empty)
//! 2. `FILTER` when `badStars` is present
//! 3. `SELF-STAR` when `selfStarring` is explicitly `true`
//!
//! Each step owns a copy of the configuration it reads. A new configuration
//! means compiling a new gate.

use crate::{
    config::GatingConfig,
    matchers::{BadStars, BlockedStarrers, SelfStar, Verdict},
    platform::ReactionAdd,
};
use starwarden_core::{AnyOf, AnyOfBuilder, Check};
use starwarden_std::{
    PatternCache,
    checks::{TimeoutCheck, TracedCheck},
};
use std::{sync::Arc, time::Duration};

/// Name of the blocked-starrer step.
pub const USER_BLOCK: &str = "USER-BLOCK";
/// Name of the disqualified-message step.
pub const FILTER: &str = "FILTER";
/// Name of the self-star step.
pub const SELF_STAR: &str = "SELF-STAR";

/// The compiled gating pipeline.
pub type Gate = AnyOf<ReactionAdd, Verdict>;

/// Compiles configurations into gates.
#[derive(Clone)]
pub struct RuleCompiler {
    patterns: Arc<PatternCache>,
    timeout: Option<Duration>,
}

impl RuleCompiler {
    /// A compiler resolving username patterns through `patterns`.
    pub fn new(patterns: Arc<PatternCache>) -> Self {
        Self {
            patterns,
            timeout: None,
        }
    }

    /// Bound every step by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the gate for `config`.
    pub fn compile(&self, config: &GatingConfig) -> Gate {
        let mut builder = AnyOf::builder();

        if let Some(rules) = &config.blocked_starrers {
            let check = BlockedStarrers::new(rules.clone(), self.patterns.clone());
            builder = self.push(builder, USER_BLOCK, check);
        }
        if let Some(rules) = &config.bad_stars {
            builder = self.push(builder, FILTER, BadStars::new(rules.clone()));
        }
        if config.self_starring == Some(true) {
            builder = self.push(builder, SELF_STAR, SelfStar);
        }

        let gate = builder.build();
        tracing::debug!(
            guild_id = %config.guild_id,
            steps = ?gate.step_names().collect::<Vec<_>>(),
            timeout = ?self.timeout,
            "compiled star gate"
        );
        gate
    }

    fn push<C>(
        &self,
        builder: AnyOfBuilder<ReactionAdd, Verdict>,
        name: &'static str,
        check: C,
    ) -> AnyOfBuilder<ReactionAdd, Verdict>
    where
        C: Check<ReactionAdd, Output = Verdict>,
    {
        // The step span covers the deadline, so timeouts are recorded in it.
        match self.timeout {
            Some(timeout) => builder.step(
                name,
                TracedCheck::new(TimeoutCheck::new(check, timeout), name),
            ),
            None => builder.step(name, TracedCheck::new(check, name)),
        }
    }
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new(PatternCache::global())
    }
}

/// Compile `config` with the process-wide pattern cache and its own step
/// deadline.
pub fn compile(config: &GatingConfig) -> Gate {
    RuleCompiler::default()
        .with_timeout(config.step_timeout())
        .compile(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{DisqualificationRule, StarrerRule},
        matchers::fixtures::{message, reaction, user},
        platform::GuildId,
    };
    use starwarden_core::CheckError;
    use starwarden_std::testing::StallingCheck;

    fn config() -> GatingConfig {
        GatingConfig {
            guild_id: GuildId(1),
            star_emoji: "⭐".into(),
            self_starring: None,
            blocked_starrers: None,
            bad_stars: None,
            step_timeout_ms: None,
        }
    }

    fn steps(gate: &Gate) -> Vec<&str> {
        gate.step_names().collect()
    }

    #[test]
    fn test_nothing_configured() {
        assert!(compile(&config()).is_empty());
    }

    #[test]
    fn test_fixed_order() {
        let config = GatingConfig {
            self_starring: Some(true),
            blocked_starrers: Some(vec![StarrerRule::Bots]),
            bad_stars: Some(vec![DisqualificationRule::default()]),
            ..config()
        };
        assert_eq!(steps(&compile(&config)), [USER_BLOCK, FILTER, SELF_STAR]);
    }

    #[test]
    fn test_absent_sections_are_skipped() {
        let config = GatingConfig {
            self_starring: Some(true),
            bad_stars: Some(vec![]),
            ..config()
        };
        assert_eq!(steps(&compile(&config)), [FILTER, SELF_STAR]);
    }

    #[test]
    fn test_self_starring_false_compiles_nothing() {
        let config = GatingConfig {
            self_starring: Some(false),
            ..config()
        };
        let gate = compile(&config);
        assert!(!gate.contains(SELF_STAR));
        assert!(gate.is_empty());
    }

    #[tokio::test]
    async fn test_empty_blocked_list_still_compiles_a_passing_step() {
        let config = GatingConfig {
            blocked_starrers: Some(vec![]),
            ..config()
        };
        let gate = compile(&config);
        assert_eq!(steps(&gate), [USER_BLOCK]);

        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        assert!(gate.evaluate(&event).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_steps_capture_configuration() {
        let mut config = GatingConfig {
            blocked_starrers: Some(vec![StarrerRule::Username("bob".into())]),
            ..config()
        };
        let gate = compile(&config);
        config.blocked_starrers = Some(vec![]);

        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        let finding = gate.evaluate(&event).await.unwrap().unwrap();
        assert_eq!(finding.step, USER_BLOCK);
    }

    #[tokio::test]
    async fn test_compiled_pattern_error_names_step() {
        let config = GatingConfig {
            blocked_starrers: Some(vec![StarrerRule::UsernamePattern("(".into())]),
            ..config()
        };
        let gate = RuleCompiler::new(Arc::new(PatternCache::new()))
            .with_timeout(Some(Duration::from_secs(5)))
            .compile(&config);

        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        match gate.evaluate(&event).await {
            Err(CheckError::Failed { step, .. }) => assert_eq!(step, USER_BLOCK),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stalled_step_times_out_under_its_name() {
        let compiler = RuleCompiler::new(Arc::new(PatternCache::new()))
            .with_timeout(Some(Duration::from_millis(10)));
        let gate = compiler
            .push(AnyOf::builder(), FILTER, StallingCheck::<Verdict>::new())
            .build();

        let event = reaction(user(2, "bob"), message(user(1, "alice")));
        match gate.evaluate(&event).await {
            Err(CheckError::TimedOut { step, after }) => {
                assert_eq!(step, FILTER);
                assert_eq!(after, Duration::from_millis(10));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
