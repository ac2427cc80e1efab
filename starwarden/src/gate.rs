//! # Event Entry Point
//!
//! A starboard is a [`Pipeline`]: [`ReactionSource`] drops reactions from other
//! guilds or with other emoji, and [`StarWarden`] gates the rest.
//!
//! ```text
//! ReactionAdd ─▶ ReactionSource ──(filtered out)──▶ Next
//!                      │
//!                      ▼
//!                 StarWarden ─▶ gate ─(accepted)──────────▶ Next
//!                                  ├─(rejected)─▶ censure ─▶ Stop
//!                                  └─(step failed)─────────▶ Next
//! ```
//!
//! A failing step never costs a user their star: the event is logged and
//! accepted.

use crate::{
    censure::Censure,
    compiler::{self, Gate},
    config::GatingConfig,
    error::WardenError,
    localize::Localizer,
    matchers::{Detail, Verdict},
    platform::{GuildId, ReactionAdd, ReactionClient},
};
use starwarden_core::{
    BoxError, Finding, Handler, HookResult, IntoResponse, Listener, Pipeline,
};
use std::sync::Arc;

/// A star rejected by a gating step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The step that rejected it.
    pub step: String,
    /// The configured reason, or a bare flag.
    pub detail: Detail,
}

impl From<Finding<Verdict>> for Rejection {
    fn from(finding: Finding<Verdict>) -> Self {
        Self {
            step: finding.step.into_owned(),
            detail: finding.value.unwrap_or(Detail::Flagged),
        }
    }
}

/// The gate's decision for one reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gating {
    /// No step objected.
    Accepted,
    /// A step objected.
    Rejected(Rejection),
}

/// Where a reaction ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The star stays.
    Accepted,
    /// The star was rejected.
    Rejected {
        /// Which step rejected it and why.
        rejection: Rejection,
        /// Whether the reaction was removed.
        retracted: bool,
        /// Whether the user was warned.
        notified: bool,
    },
    /// A step failed; the star stays.
    Faulted,
}

impl IntoResponse for Disposition {
    fn into_response(self) -> Result<HookResult, BoxError> {
        Ok(match self {
            Disposition::Rejected { .. } => HookResult::Stop,
            Disposition::Accepted | Disposition::Faulted => HookResult::Next,
        })
    }
}

/// Passes on star reactions in one guild.
#[derive(Debug, Clone)]
pub struct ReactionSource {
    guild_id: GuildId,
    star_emoji: String,
}

impl ReactionSource {
    /// Listen for `star_emoji` in `guild_id`.
    pub fn new(guild_id: GuildId, star_emoji: impl Into<String>) -> Self {
        Self {
            guild_id,
            star_emoji: star_emoji.into(),
        }
    }

    /// Listen for the guild and emoji named in `config`.
    pub fn from_config(config: &GatingConfig) -> Self {
        Self::new(config.guild_id, config.star_emoji.clone())
    }

    /// Whether `event` is a star in the watched guild.
    pub fn accepts(&self, event: &ReactionAdd) -> bool {
        event.guild_id == Some(self.guild_id) && event.emoji.matches(&self.star_emoji)
    }
}

impl Listener<ReactionAdd> for ReactionSource {
    type Output = ReactionAdd;

    async fn listen(&self, event: &ReactionAdd) -> Result<Option<ReactionAdd>, BoxError> {
        if self.accepts(event) {
            return Ok(Some(event.clone()));
        }
        tracing::trace!(
            guild_id = ?event.guild_id,
            message_id = %event.message.id,
            emoji = %event.emoji,
            "reaction filtered out"
        );
        Ok(None)
    }
}

/// Gates star reactions and censures rejected ones.
pub struct StarWarden {
    gate: Gate,
    censure: Censure,
}

impl StarWarden {
    /// Compile `config` and act through `client`.
    pub fn new(
        config: &GatingConfig,
        client: Arc<dyn ReactionClient>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self::from_parts(compiler::compile(config), Censure::new(client, localizer))
    }

    /// Assemble from an already compiled gate.
    pub fn from_parts(gate: Gate, censure: Censure) -> Self {
        Self { gate, censure }
    }

    /// The compiled step names, in evaluation order.
    pub fn steps(&self) -> impl Iterator<Item = &str> + '_ {
        self.gate.step_names()
    }

    /// Decide on `event` without side effects.
    pub async fn gate(&self, event: &ReactionAdd) -> Result<Gating, WardenError> {
        Ok(match self.gate.evaluate(event).await? {
            Some(finding) => Gating::Rejected(finding.into()),
            None => Gating::Accepted,
        })
    }

    /// Decide on `event` and censure it if rejected.
    pub async fn process(&self, event: &ReactionAdd) -> Disposition {
        let rejection = match self.gate(event).await {
            Ok(Gating::Accepted) => {
                tracing::trace!(
                    message_id = %event.message.id,
                    user_id = %event.user.id,
                    "star accepted"
                );
                return Disposition::Accepted;
            }
            Ok(Gating::Rejected(rejection)) => rejection,
            Err(error) => {
                tracing::warn!(
                    guild_id = ?event.guild_id,
                    message_id = %event.message.id,
                    user_id = %event.user.id,
                    %error,
                    "star gating failed; accepting"
                );
                return Disposition::Faulted;
            }
        };

        tracing::info!(
            guild_id = ?event.guild_id,
            message_id = %event.message.id,
            user_id = %event.user.id,
            step = %rejection.step,
            reason = rejection.detail.reason(),
            "star rejected"
        );

        match self.censure.apply(event, &rejection).await {
            Ok(notified) => Disposition::Rejected {
                rejection,
                retracted: true,
                notified,
            },
            Err(error) => {
                tracing::warn!(
                    message_id = %event.message.id,
                    user_id = %event.user.id,
                    step = %rejection.step,
                    %error,
                    "rejected star could not be retracted"
                );
                Disposition::Rejected {
                    rejection,
                    retracted: false,
                    notified: false,
                }
            }
        }
    }
}

impl Handler<ReactionAdd> for StarWarden {
    type Output = Disposition;

    async fn call(&self, input: ReactionAdd) -> Disposition {
        self.process(&input).await
    }
}

/// A complete starboard gate, usable as a [`Hook`](starwarden_core::Hook).
pub type Starboard = Pipeline<ReactionSource, StarWarden>;

/// Build the starboard gate for `config`.
pub fn starboard(
    config: &GatingConfig,
    client: Arc<dyn ReactionClient>,
    localizer: Arc<dyn Localizer>,
) -> Starboard {
    ReactionSource::from_config(config).handler(StarWarden::new(config, client, localizer))
}
