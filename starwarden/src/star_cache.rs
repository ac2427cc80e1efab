//! Star counts for messages on the starboard.
//!
//! [`StarCache`] keeps every tracked message in memory and writes each change
//! through to a [`StarLedger`]. It must be [initialized](StarCache::initialize)
//! from the ledger before use; every other operation fails with
//! [`CacheError::OperationOnUninitialized`] until then.

use crate::platform::{ChannelId, Message, MessageId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use starwarden_core::BoxError;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by the star cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache was used before [`StarCache::initialize`].
    #[error("star cache used before initialization")]
    OperationOnUninitialized,

    /// The backing ledger failed.
    #[error("star ledger failed: {0}")]
    Ledger(#[source] BoxError),
}

/// A tracked message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarEntry {
    /// The starred message.
    pub message_id: MessageId,
    /// Channel of the starred message.
    pub channel_id: ChannelId,
    /// Author of the starred message, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    /// Current star count.
    pub stars: u32,
    /// The starboard post mirroring the message, once there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_message_id: Option<MessageId>,
}

impl StarEntry {
    fn unstarred(message: &Message) -> Self {
        Self {
            message_id: message.id,
            channel_id: message.channel_id,
            author_id: message.author.as_ref().map(|author| author.id),
            stars: 0,
            board_message_id: None,
        }
    }
}

/// Persistent storage behind a [`StarCache`].
#[async_trait]
pub trait StarLedger: Send + Sync {
    /// Every stored entry.
    async fn load_all(&self) -> Result<Vec<StarEntry>, BoxError>;

    /// Insert or replace `entry`.
    async fn save(&self, entry: &StarEntry) -> Result<(), BoxError>;

    /// Forget the entry for `message_id`, if any.
    async fn delete(&self, message_id: MessageId) -> Result<(), BoxError>;
}

/// A ledger that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<HashMap<MessageId, StarEntry>>,
}

impl MemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger pre-filled with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = StarEntry>) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|entry| (entry.message_id, entry))
                    .collect(),
            ),
        }
    }

    /// The stored entry for `message_id`.
    pub fn stored(&self, message_id: MessageId) -> Option<StarEntry> {
        self.lock().get(&message_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<MessageId, StarEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StarLedger for MemoryLedger {
    async fn load_all(&self) -> Result<Vec<StarEntry>, BoxError> {
        Ok(self.lock().values().cloned().collect())
    }

    async fn save(&self, entry: &StarEntry) -> Result<(), BoxError> {
        self.lock().insert(entry.message_id, entry.clone());
        Ok(())
    }

    async fn delete(&self, message_id: MessageId) -> Result<(), BoxError> {
        self.lock().remove(&message_id);
        Ok(())
    }
}

/// In-memory star counts backed by a ledger.
pub struct StarCache {
    ledger: Arc<dyn StarLedger>,
    entries: RwLock<HashMap<MessageId, StarEntry>>,
    initialized: AtomicBool,
}

impl StarCache {
    /// A cache over `ledger`. Call [`initialize`](Self::initialize) next.
    pub fn new(ledger: Arc<dyn StarLedger>) -> Self {
        Self {
            ledger,
            entries: RwLock::new(HashMap::new()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Load every entry from the ledger. Calling it again reloads.
    pub async fn initialize(&self) -> Result<usize, CacheError> {
        let loaded = self.ledger.load_all().await.map_err(CacheError::Ledger)?;
        let mut entries = self.entries.write().await;
        *entries = loaded
            .into_iter()
            .map(|entry| (entry.message_id, entry))
            .collect();
        self.initialized.store(true, Ordering::Release);
        tracing::debug!(entries = entries.len(), "star cache initialized");
        Ok(entries.len())
    }

    /// Whether [`initialize`](Self::initialize) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn ensure_initialized(&self) -> Result<(), CacheError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(CacheError::OperationOnUninitialized)
        }
    }

    /// The entry for `message_id`.
    pub async fn get(&self, message_id: MessageId) -> Result<Option<StarEntry>, CacheError> {
        self.ensure_initialized()?;
        Ok(self.entries.read().await.get(&message_id).cloned())
    }

    /// Number of tracked messages.
    pub async fn len(&self) -> Result<usize, CacheError> {
        self.ensure_initialized()?;
        Ok(self.entries.read().await.len())
    }

    /// Count one more star on `message`, tracking it if new.
    pub async fn record_star(&self, message: &Message) -> Result<StarEntry, CacheError> {
        self.ensure_initialized()?;
        let mut entries = self.entries.write().await;
        let mut entry = entries
            .get(&message.id)
            .cloned()
            .unwrap_or_else(|| StarEntry::unstarred(message));
        entry.stars = entry.stars.saturating_add(1);

        self.ledger.save(&entry).await.map_err(CacheError::Ledger)?;
        entries.insert(entry.message_id, entry.clone());
        Ok(entry)
    }

    /// Count one star fewer on `message_id`. Untracked messages are ignored.
    pub async fn retract_star(&self, message_id: MessageId) -> Result<Option<StarEntry>, CacheError> {
        self.update(message_id, |entry| {
            entry.stars = entry.stars.saturating_sub(1);
        })
        .await
    }

    /// Link `message_id` to its starboard post.
    pub async fn set_board_message(
        &self,
        message_id: MessageId,
        board_message_id: MessageId,
    ) -> Result<Option<StarEntry>, CacheError> {
        self.update(message_id, |entry| {
            entry.board_message_id = Some(board_message_id);
        })
        .await
    }

    /// Stop tracking `message_id`.
    pub async fn remove(&self, message_id: MessageId) -> Result<Option<StarEntry>, CacheError> {
        self.ensure_initialized()?;
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&message_id) {
            return Ok(None);
        }
        self.ledger
            .delete(message_id)
            .await
            .map_err(CacheError::Ledger)?;
        Ok(entries.remove(&message_id))
    }

    async fn update(
        &self,
        message_id: MessageId,
        change: impl FnOnce(&mut StarEntry),
    ) -> Result<Option<StarEntry>, CacheError> {
        self.ensure_initialized()?;
        let mut entries = self.entries.write().await;
        let Some(mut entry) = entries.get(&message_id).cloned() else {
            return Ok(None);
        };
        change(&mut entry);

        self.ledger.save(&entry).await.map_err(CacheError::Ledger)?;
        entries.insert(message_id, entry.clone());
        Ok(Some(entry))
    }
}
