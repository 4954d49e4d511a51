//! Message repository
//!
//! Append-only: rows are never removed or reordered, and only the read flag
//! changes after insertion.

use crate::domain::entities::Message;
use crate::domain::state::StateError;

#[derive(Debug, Clone, Default)]
pub struct MessageRepository {
    rows: Vec<Message>,
}

impl MessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_rows(rows: Vec<Message>) -> Self {
        Self { rows }
    }

    /// List messages for a conversation, in append order
    pub fn list_by_conversation(&self, conversation_id: &str) -> Vec<Message> {
        self.rows
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect()
    }

    /// Append a new message
    pub fn create(&mut self, msg: Message) -> Message {
        self.rows.push(msg.clone());
        msg
    }

    /// Mark every unread message in the conversation not sent by `reader_id` as read.
    ///
    /// Returns how many messages changed.
    pub fn mark_read_for(
        &mut self,
        conversation_id: &str,
        reader_id: &str,
    ) -> Result<usize, StateError> {
        let mut changed = 0;
        for msg in self.rows.iter_mut().filter(|m| {
            m.conversation_id == conversation_id && m.sender_id != reader_id && !m.read
        }) {
            msg.mark_read()?;
            changed += 1;
        }
        Ok(changed)
    }

    pub fn all(&self) -> &[Message] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
