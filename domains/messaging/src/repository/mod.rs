//! In-memory repositories for the messaging domain

pub mod conversations;
pub mod messages;

pub use conversations::ConversationRepository;
pub use messages::MessageRepository;

use crate::persistence::ChatSnapshot;

/// Combined repository access for the messaging domain
#[derive(Debug, Clone, Default)]
pub struct MessagingRepositories {
    pub conversations: ConversationRepository,
    pub messages: MessageRepository,
}

impl MessagingRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild repositories from a persisted snapshot, keeping stored order
    pub fn from_snapshot(snapshot: ChatSnapshot) -> Self {
        Self {
            conversations: ConversationRepository::from_rows(snapshot.conversations),
            messages: MessageRepository::from_rows(snapshot.messages),
        }
    }

    pub fn to_snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            conversations: self.conversations.all().to_vec(),
            messages: self.messages.all().to_vec(),
        }
    }
}
