//! Conversation repository

use crate::domain::entities::{Conversation, Message, UserRole};

#[derive(Debug, Clone, Default)]
pub struct ConversationRepository {
    rows: Vec<Conversation>,
}

impl ConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_rows(rows: Vec<Conversation>) -> Self {
        Self { rows }
    }

    /// Find conversation by ID
    pub fn find(&self, id: &str) -> Option<&Conversation> {
        self.rows.iter().find(|c| c.id == id)
    }

    /// Find the conversation between a patient and a doctor
    pub fn find_by_participants(&self, patient_id: &str, doctor_id: &str) -> Option<&Conversation> {
        self.rows
            .iter()
            .find(|c| c.patient_id == patient_id && c.doctor_id == doctor_id)
    }

    /// List conversations visible to a user, in insertion order
    pub fn list_for_user(&self, user_id: &str, role: UserRole) -> Vec<Conversation> {
        self.rows
            .iter()
            .filter(|c| c.is_visible_to(user_id, role))
            .cloned()
            .collect()
    }

    /// Create a new conversation
    pub fn create(&mut self, conv: Conversation) -> Conversation {
        self.rows.push(conv.clone());
        conv
    }

    /// Fold an appended message into its conversation summary.
    ///
    /// Returns the updated conversation, or `None` when the message is detached.
    pub fn record_message(&mut self, message: &Message) -> Option<Conversation> {
        let conv = self
            .rows
            .iter_mut()
            .find(|c| c.id == message.conversation_id)?;
        conv.record_message(message);
        Some(conv.clone())
    }

    /// Zero the unread counter; returns whether the conversation exists
    pub fn reset_unread(&mut self, id: &str) -> bool {
        match self.rows.iter_mut().find(|c| c.id == id) {
            Some(conv) => {
                conv.reset_unread();
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> &[Conversation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
