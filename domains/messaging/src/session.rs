//! Participant session
//!
//! The messaging view of a signed-in user: their inbox, the unread badge,
//! opening a thread (which marks it read) and sending into it.

use crate::domain::entities::{Conversation, Message, Participant};
use crate::error::{MessagingError, Result};
use crate::store::MessagingStore;

pub struct ParticipantSession<'a> {
    store: &'a mut MessagingStore,
    participant: Participant,
}

impl<'a> ParticipantSession<'a> {
    pub fn new(store: &'a mut MessagingStore, participant: Participant) -> Self {
        Self { store, participant }
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    /// Conversations this participant takes part in; always empty for admins
    pub fn inbox(&self) -> Vec<Conversation> {
        self.store
            .user_conversations(&self.participant.id, self.participant.role)
    }

    pub fn unread_total(&self) -> u32 {
        self.store
            .unread_total(&self.participant.id, self.participant.role)
    }

    /// Open a conversation: mark it read for this participant and return its messages
    pub fn open(&mut self, conversation_id: &str) -> Result<Vec<Message>> {
        let conv = self.visible_conversation(conversation_id)?;
        self.store.mark_as_read(&conv.id, &self.participant.id)?;
        Ok(self.store.conversation_messages(&conv.id))
    }

    /// Send `text` as this participant; the text is stored as typed
    pub fn send(&mut self, conversation_id: &str, text: &str) -> Result<Message> {
        Message::validate_content(text)?;

        let sender_role = self
            .participant
            .role
            .sender_role()
            .ok_or(MessagingError::UnsupportedRole(self.participant.role))?;

        let conv = self.visible_conversation(conversation_id)?;

        tracing::debug!(
            conversation_id = %conv.id,
            sender_id = %self.participant.id,
            "Sending message"
        );

        self.store.append_message(
            &conv.id,
            text,
            &self.participant.id,
            &self.participant.name,
            sender_role,
        )
    }

    fn visible_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.store
            .find_conversation(conversation_id)
            .filter(|c| c.is_visible_to(&self.participant.id, self.participant.role))
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.to_string()))
    }
}
