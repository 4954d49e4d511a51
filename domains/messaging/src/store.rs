//! Messaging store
//!
//! The single owner of all conversation and message state. Constructed once
//! with an injected key-value backend: state is loaded on open and the whole
//! snapshot is saved after every mutation. Mutations take `&mut self`, so
//! callers that share a store across threads must wrap it themselves.
//!
//! If a save fails the in-memory mutation stands and the error is returned;
//! the store stays dirty until a later save writes the full state again.

use carelink_common::{Config, ValidationMode};
use carelink_storage::{KeyValueStore, MemoryKeyValueStore};
use chrono::{DateTime, Utc};

use crate::domain::entities::{Conversation, Message, NewMessage, Participant, SenderRole, UserRole};
use crate::error::{MessagingError, Result};
use crate::persistence::{ChatSnapshot, ChatSnapshotRef, SnapshotPersistence, DEFAULT_STORAGE_KEY};
use crate::repository::MessagingRepositories;

/// Store construction options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub validation: ValidationMode,
    pub storage_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Strict,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            validation: config.validation,
            storage_key: config.storage_key.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MessagingStore {
    repos: MessagingRepositories,
    persistence: SnapshotPersistence,
    validation: ValidationMode,
    last_timestamp: Option<DateTime<Utc>>,
    /// Set while in-memory state is ahead of the backend
    dirty: bool,
}

impl MessagingStore {
    /// Open a store over `backend`, loading any previously saved snapshot
    pub fn open(backend: Box<dyn KeyValueStore>, options: StoreOptions) -> Result<Self> {
        let persistence = SnapshotPersistence::new(backend, options.storage_key);
        let repos = match persistence.load()? {
            Some(snapshot) => MessagingRepositories::from_snapshot(snapshot),
            None => MessagingRepositories::new(),
        };

        let last_timestamp = latest_timestamp(&repos);

        tracing::info!(
            key = %persistence.key(),
            conversations = repos.conversations.len(),
            messages = repos.messages.len(),
            validation = ?options.validation,
            "Opened messaging store"
        );

        Ok(Self {
            repos,
            persistence,
            validation: options.validation,
            last_timestamp,
            dirty: false,
        })
    }

    /// An empty store backed by process memory only
    pub fn in_memory(validation: ValidationMode) -> Self {
        Self {
            repos: MessagingRepositories::new(),
            persistence: SnapshotPersistence::new(
                Box::new(MemoryKeyValueStore::new()),
                DEFAULT_STORAGE_KEY,
            ),
            validation,
            last_timestamp: None,
            dirty: false,
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validation
    }

    /// Append a message and fold it into its conversation.
    ///
    /// The conversation's unread counter rises by one for every append,
    /// whoever the sender is.
    pub fn append_message(
        &mut self,
        conversation_id: &str,
        content: &str,
        sender_id: &str,
        sender_name: &str,
        sender_role: SenderRole,
    ) -> Result<Message> {
        self.append(NewMessage::new(
            conversation_id,
            content,
            sender_id,
            sender_name,
            sender_role,
        ))
    }

    /// Append a message built from a draft
    pub fn append(&mut self, draft: NewMessage) -> Result<Message> {
        if self.validation == ValidationMode::Strict {
            Message::validate_content(&draft.content)?;
            self.require_conversation(&draft.conversation_id)?;
        }

        let timestamp = self.next_timestamp();
        let message = self.repos.messages.create(Message::new(draft, timestamp));

        match self.repos.conversations.record_message(&message) {
            Some(conv) => tracing::debug!(
                conversation_id = %conv.id,
                message_id = %message.id,
                unread_count = conv.unread_count,
                "Appended message"
            ),
            None => tracing::warn!(
                conversation_id = %message.conversation_id,
                message_id = %message.id,
                "Appended message to unknown conversation"
            ),
        }

        self.persist()?;
        Ok(message)
    }

    /// Mark the conversation read on behalf of `user_id`.
    ///
    /// Messages sent by anyone else become read; the user's own messages keep
    /// their flag. The unread counter is zeroed regardless of how many flags
    /// changed, including when `user_id` is the only sender.
    pub fn mark_as_read(&mut self, conversation_id: &str, user_id: &str) -> Result<()> {
        if self.validation == ValidationMode::Strict {
            self.require_conversation(conversation_id)?;
        }

        let flipped = self.repos.messages.mark_read_for(conversation_id, user_id)?;
        let found = self.repos.conversations.reset_unread(conversation_id);
        if !found {
            tracing::warn!(conversation_id, "Marked unknown conversation as read");
        }

        tracing::debug!(conversation_id, user_id, flipped, "Marked conversation read");

        self.persist()
    }

    /// All messages of a conversation in append order
    pub fn conversation_messages(&self, conversation_id: &str) -> Vec<Message> {
        self.repos.messages.list_by_conversation(conversation_id)
    }

    /// Conversations a user sees for a role, in insertion order.
    ///
    /// Patients see conversations where they are the patient, doctors where
    /// they are the doctor; admins see none.
    pub fn user_conversations(&self, user_id: &str, role: UserRole) -> Vec<Conversation> {
        self.repos.conversations.list_for_user(user_id, role)
    }

    /// Sum of unread counters over the user's conversations
    pub fn unread_total(&self, user_id: &str, role: UserRole) -> u32 {
        self.user_conversations(user_id, role)
            .iter()
            .fold(0u32, |sum, c| sum.saturating_add(c.unread_count))
    }

    pub fn find_conversation(&self, conversation_id: &str) -> Option<Conversation> {
        self.repos.conversations.find(conversation_id).cloned()
    }

    /// Get or create the conversation between a patient and a doctor
    pub fn start_conversation(
        &mut self,
        patient: &Participant,
        doctor: &Participant,
    ) -> Result<Conversation> {
        let candidate = Conversation::new(patient, doctor)?;

        if let Some(existing) = self
            .repos
            .conversations
            .find_by_participants(&patient.id, &doctor.id)
        {
            let existing = existing.clone();
            if self.dirty {
                self.persist()?;
            }
            return Ok(existing);
        }

        let created = self.repos.conversations.create(candidate);
        tracing::info!(
            conversation_id = %created.id,
            patient_id = %created.patient_id,
            doctor_id = %created.doctor_id,
            "Started conversation"
        );

        self.persist()?;
        Ok(created)
    }

    /// Copy of the full state in its persisted shape
    pub fn snapshot(&self) -> ChatSnapshot {
        self.repos.to_snapshot()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.conversations.is_empty() && self.repos.messages.is_empty()
    }

    /// Swap in a whole new state and persist it
    pub(crate) fn replace_state(&mut self, snapshot: ChatSnapshot) -> Result<()> {
        self.repos = MessagingRepositories::from_snapshot(snapshot);
        self.last_timestamp = latest_timestamp(&self.repos);
        self.persist()
    }

    fn require_conversation(&self, conversation_id: &str) -> Result<()> {
        if self.repos.conversations.find(conversation_id).is_none() {
            return Err(MessagingError::ConversationNotFound(
                conversation_id.to_string(),
            ));
        }
        Ok(())
    }

    /// Wall-clock now, clamped so timestamps never go backwards within the store
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    /// Whether some mutation has not reached the backend yet
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    fn persist(&mut self) -> Result<()> {
        let result = self.persistence.save_ref(ChatSnapshotRef {
            conversations: self.repos.conversations.all(),
            messages: self.repos.messages.all(),
        });
        self.dirty = result.is_err();
        if let Err(e) = &result {
            tracing::error!(error = %e, "Failed to persist chat snapshot");
        }
        result
    }
}

fn latest_timestamp(repos: &MessagingRepositories) -> Option<DateTime<Utc>> {
    let from_messages = repos.messages.all().iter().map(|m| m.timestamp);
    let from_conversations = repos
        .conversations
        .all()
        .iter()
        .filter_map(|c| c.last_message_time);
    from_messages.chain(from_conversations).max()
}
