//! Blocked starrers.

use super::{Detail, Verdict};
use crate::{
    config::StarrerRule,
    platform::{ReactionAdd, User},
};
use starwarden_core::{BoxError, Check};
use starwarden_std::{PatternCache, PatternCompileError};
use std::sync::Arc;

/// Rejects stars from actors matching any starrer rule.
pub struct BlockedStarrers {
    rules: Vec<StarrerRule>,
    patterns: Arc<PatternCache>,
}

impl BlockedStarrers {
    /// Build the matcher over `rules`, compiling patterns through `patterns`.
    pub fn new(rules: Vec<StarrerRule>, patterns: Arc<PatternCache>) -> Self {
        Self { rules, patterns }
    }

    /// Whether `user` may not star anything.
    ///
    /// Username rules see the current handle. A malformed pattern is an
    /// error, not a match.
    pub fn is_blocked(&self, user: &User) -> Result<bool, PatternCompileError> {
        for rule in &self.rules {
            if self.rule_matches(rule, user)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn rule_matches(&self, rule: &StarrerRule, user: &User) -> Result<bool, PatternCompileError> {
        Ok(match rule {
            StarrerRule::Bots => user.bot,
            StarrerRule::Username(name) => user.name == *name,
            StarrerRule::UsernamePattern(pattern) => {
                self.patterns.compile(pattern)?.is_match(&user.name)
            }
            StarrerRule::User(id) => user.id == *id,
        })
    }
}

impl Check<ReactionAdd> for BlockedStarrers {
    type Output = Verdict;

    async fn check(&self, event: &ReactionAdd) -> Result<Verdict, BoxError> {
        Ok(self.is_blocked(&event.user)?.then_some(Detail::Flagged))
    }
}
