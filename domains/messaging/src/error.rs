//! Messaging error types

use carelink_common::Error;
use carelink_storage::StorageError;
use thiserror::Error;

use crate::domain::entities::UserRole;
use crate::domain::state::StateError;

pub type Result<T> = std::result::Result<T, MessagingError>;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Conversation {0} not found")]
    ConversationNotFound(String),

    #[error("Message content cannot be empty or whitespace-only")]
    InvalidContent,

    #[error("Role {0} cannot take part in conversations")]
    UnsupportedRole(UserRole),

    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl From<MessagingError> for Error {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::ConversationNotFound(_) => Error::NotFound(err.to_string()),
            MessagingError::InvalidContent | MessagingError::InvalidParticipants(_) => {
                Error::Validation(err.to_string())
            }
            MessagingError::UnsupportedRole(_) => Error::Authorization(err.to_string()),
            MessagingError::UnsupportedSnapshotVersion { .. } => Error::Storage(err.to_string()),
            MessagingError::Snapshot(e) => Error::Serialization(e),
            MessagingError::Storage(e) => e.into(),
            MessagingError::State(e) => Error::Internal(e.to_string()),
        }
    }
}
