//! Whole-state snapshot persistence
//!
//! The store writes its full state to a single key-value slot after every
//! mutation and reads it back on open. The slot holds
//! `{"state": {"conversations": [...], "messages": [...]}, "version": 0}`,
//! the same envelope the browser client used for local storage.

use carelink_storage::KeyValueStore;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Conversation, Message};
use crate::error::{MessagingError, Result};

/// Current snapshot envelope version
pub const SNAPSHOT_VERSION: u32 = 0;

/// Slot used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "chat-storage";

/// Full messaging state in its persisted shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
}

/// Borrowed view used for saving without cloning the collections
#[derive(Serialize)]
pub(crate) struct ChatSnapshotRef<'a> {
    pub conversations: &'a [Conversation],
    pub messages: &'a [Message],
}

#[derive(Serialize, Deserialize)]
struct Envelope<S> {
    state: S,
    version: u32,
}

impl ChatSnapshot {
    pub fn to_json(&self) -> Result<String> {
        encode(self)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let envelope: Envelope<ChatSnapshot> = serde_json::from_str(raw)?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(MessagingError::UnsupportedSnapshotVersion {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(envelope.state)
    }
}

fn encode<S: Serialize>(state: S) -> Result<String> {
    Ok(serde_json::to_string(&Envelope {
        state,
        version: SNAPSHOT_VERSION,
    })?)
}

/// Reads and writes the chat snapshot in one key-value slot
pub struct SnapshotPersistence {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for SnapshotPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl SnapshotPersistence {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored snapshot; `None` when nothing has been saved yet
    pub fn load(&self) -> Result<Option<ChatSnapshot>> {
        match self.backend.get(&self.key)? {
            Some(raw) => {
                let snapshot = ChatSnapshot::from_json(&raw)?;
                tracing::debug!(
                    key = %self.key,
                    conversations = snapshot.conversations.len(),
                    messages = snapshot.messages.len(),
                    "Loaded chat snapshot"
                );
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    pub fn save(&self, snapshot: &ChatSnapshot) -> Result<()> {
        self.write(encode(snapshot)?)
    }

    pub(crate) fn save_ref(&self, snapshot: ChatSnapshotRef<'_>) -> Result<()> {
        self.write(encode(snapshot)?)
    }

    fn write(&self, raw: String) -> Result<()> {
        self.backend.set(&self.key, &raw)?;
        tracing::debug!(
            key = %self.key,
            provider = self.backend.provider(),
            bytes = raw.len(),
            "Saved chat snapshot"
        );
        Ok(())
    }
}
