//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use starwarden::{
    GatingConfig, PlatformError, ReactionAdd, ReactionClient,
    platform::{ChannelId, Emoji, GuildId, Message, MessageId, User, UserId, WebhookId},
};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

pub const GUILD: GuildId = GuildId(1);

/// Records every platform call; either call can be made to fail.
#[derive(Default)]
pub struct FakeClient {
    removals: Mutex<Vec<(MessageId, Emoji, UserId)>>,
    direct_messages: Mutex<Vec<(UserId, String)>>,
    fail_removal: AtomicBool,
    fail_direct_message: AtomicBool,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_removal(self) -> Self {
        self.fail_removal.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_direct_message(self) -> Self {
        self.fail_direct_message.store(true, Ordering::SeqCst);
        self
    }

    pub fn removals(&self) -> Vec<(MessageId, Emoji, UserId)> {
        self.removals.lock().unwrap().clone()
    }

    pub fn direct_messages(&self) -> Vec<(UserId, String)> {
        self.direct_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReactionClient for FakeClient {
    async fn remove_reaction(
        &self,
        message: &Message,
        emoji: &Emoji,
        user: UserId,
    ) -> Result<(), PlatformError> {
        if self.fail_removal.load(Ordering::SeqCst) {
            return Err(PlatformError::MissingPermission("MANAGE_MESSAGES".into()));
        }
        self.removals
            .lock()
            .unwrap()
            .push((message.id, emoji.clone(), user));
        Ok(())
    }

    async fn send_direct_message(&self, user: UserId, content: &str) -> Result<(), PlatformError> {
        if self.fail_direct_message.load(Ordering::SeqCst) {
            return Err(PlatformError::DirectMessagesClosed(user));
        }
        self.direct_messages
            .lock()
            .unwrap()
            .push((user, content.to_string()));
        Ok(())
    }
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn user(id: u64, name: &str) -> User {
    User {
        id: UserId(id),
        name: name.into(),
        bot: false,
    }
}

pub fn bot(id: u64, name: &str) -> User {
    User {
        bot: true,
        ..user(id, name)
    }
}

pub fn message(author: User) -> Message {
    Message {
        id: MessageId(500),
        channel_id: ChannelId(20),
        guild_id: Some(GUILD),
        author: Some(author),
        webhook_id: None,
        content: Some("look at this".into()),
        created_at: created_at(),
    }
}

pub fn webhook_message(webhook: u64) -> Message {
    Message {
        webhook_id: Some(WebhookId(webhook)),
        ..message(bot(webhook, "Deploy Notifier"))
    }
}

pub fn star(actor: User, message: Message) -> ReactionAdd {
    ReactionAdd {
        guild_id: Some(GUILD),
        emoji: Emoji::Unicode("⭐".into()),
        received_at: created_at(),
        message,
        user: actor,
    }
}

pub fn config(json: &str) -> GatingConfig {
    serde_json::from_str(json).unwrap()
}
