//! Messaging domain: patient/doctor conversations, messages, read state

pub mod domain;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;
pub mod persistence;
pub mod repository;
pub mod session;
pub mod store;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, Message, NewMessage, Participant, SenderRole, UserRole};
pub use domain::state::{ReadEvent, ReadState, ReadStateMachine, StateError};

pub use error::{MessagingError, Result};
pub use persistence::{ChatSnapshot, SnapshotPersistence, SNAPSHOT_VERSION};
pub use repository::{ConversationRepository, MessageRepository, MessagingRepositories};
pub use session::ParticipantSession;
pub use store::{MessagingStore, StoreOptions};
