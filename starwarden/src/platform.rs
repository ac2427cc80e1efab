//! Platform model and client interface.
//!
//! The chat platform itself is an external collaborator. This module holds the
//! subset of its data model that gating reads, and the two client operations
//! censure needs. A host adapts its own client library to [`ReactionClient`].

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use starwarden_core::{BoxError, Event};
use std::fmt;
use thiserror::Error;

/// An identifier as written in configuration: a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// `123456789012345678`
    Number(u64),
    /// `"123456789012345678"`
    Text(String),
}

impl RawId {
    fn into_u64(self) -> Result<u64, String> {
        match self {
            RawId::Number(id) => Ok(id),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| format!("`{text}` is not a numeric identifier")),
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "RawId", into = "u64")]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// The raw identifier.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl TryFrom<RawId> for $name {
            type Error = String;

            fn try_from(raw: RawId) -> Result<Self, Self::Error> {
                raw.into_u64().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A community (server) identifier.
    GuildId
);
id_type!(
    /// An account identifier.
    UserId
);
id_type!(
    /// A channel identifier.
    ChannelId
);
id_type!(
    /// A message identifier.
    MessageId
);
id_type!(
    /// An external integration (webhook) identifier.
    WebhookId
);
id_type!(
    /// A custom emoji identifier.
    EmojiId
);

/// An account on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Current handle.
    pub name: String,
    /// Whether the account is automated.
    pub bot: bool,
}

/// A reaction emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emoji {
    /// A standard glyph such as `⭐`.
    Unicode(String),
    /// A community emoji.
    Custom {
        /// Emoji identifier.
        id: EmojiId,
        /// Emoji name, when the platform sent one.
        name: Option<String>,
    },
}

const VARIATION_SELECTOR: char = '\u{fe0f}';

impl Emoji {
    /// Whether this emoji is the one named in configuration.
    ///
    /// Glyphs compare without the emoji variation selector. Community emoji
    /// match on their identifier, their name, or the `<:name:id>` /
    /// `<a:name:id>` mention form.
    pub fn matches(&self, configured: &str) -> bool {
        match self {
            Emoji::Unicode(glyph) => {
                glyph.trim_end_matches(VARIATION_SELECTOR)
                    == configured.trim_end_matches(VARIATION_SELECTOR)
            }
            Emoji::Custom { id, name } => match mention_id(configured) {
                Some(mentioned) => mentioned == id.to_string(),
                None => id.to_string() == configured || name.as_deref() == Some(configured),
            },
        }
    }
}

/// The identifier inside `<:name:id>` or `<a:name:id>`.
fn mention_id(configured: &str) -> Option<&str> {
    let inner = configured.strip_prefix('<')?.strip_suffix('>')?;
    let rest = inner
        .strip_prefix("a:")
        .or_else(|| inner.strip_prefix(':'))?;
    let (_name, id) = rest.rsplit_once(':')?;
    Some(id)
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emoji::Unicode(glyph) => f.write_str(glyph),
            Emoji::Custom {
                id,
                name: Some(name),
            } => write!(f, "<:{name}:{id}>"),
            Emoji::Custom { id, name: None } => write!(f, "<:_:{id}>"),
        }
    }
}

/// Who a message is attributable to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender<'a> {
    /// A regular or automated account.
    Account(&'a User),
    /// An external integration; it has no account.
    Integration(WebhookId),
}

/// A message a reaction was added to.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Channel the message lives in.
    pub channel_id: ChannelId,
    /// Community the message lives in, if any.
    pub guild_id: Option<GuildId>,
    /// Author account; `None` when the platform did not deliver it.
    pub author: Option<User>,
    /// Set when the message was posted through an external integration.
    pub webhook_id: Option<WebhookId>,
    /// Text content; `None` when the platform did not deliver it.
    pub content: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Resolve the attributable sender.
    ///
    /// Integration posts resolve to the integration even when the platform
    /// also attaches a placeholder author.
    pub fn sender(&self) -> Option<Sender<'_>> {
        match (self.webhook_id, &self.author) {
            (Some(webhook), _) => Some(Sender::Integration(webhook)),
            (None, Some(author)) => Some(Sender::Account(author)),
            (None, None) => None,
        }
    }

    /// How old the message is at `now`. Negative for clock skew.
    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.created_at)
    }
}

/// A reaction was added to a message.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionAdd {
    /// Community the reaction happened in.
    pub guild_id: Option<GuildId>,
    /// The reaction emoji.
    pub emoji: Emoji,
    /// The message reacted to.
    pub message: Message,
    /// The account that reacted.
    pub user: User,
    /// When the event was received; message ages are measured against it.
    pub received_at: DateTime<Utc>,
}

impl Event for ReactionAdd {}

/// Errors reported by the platform client.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The bot lacks a permission for the operation.
    #[error("missing permission: {0}")]
    MissingPermission(String),

    /// The recipient does not accept direct messages.
    #[error("user {0} does not accept direct messages")]
    DirectMessagesClosed(UserId),

    /// The request failed.
    #[error("platform request failed: {0}")]
    Request(#[source] BoxError),
}

/// Client operations used by censure.
#[async_trait]
pub trait ReactionClient: Send + Sync {
    /// Remove `user`'s `emoji` reaction from `message`.
    async fn remove_reaction(
        &self,
        message: &Message,
        emoji: &Emoji,
        user: UserId,
    ) -> Result<(), PlatformError>;

    /// Send a direct message to `user`.
    async fn send_direct_message(&self, user: UserId, content: &str) -> Result<(), PlatformError>;
}
