//! State machine for message read status
//!
//! Message states: Unread → Read (terminal)

pub use carelink_common::StateError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadState {
    Unread,
    Read,
}

impl ReadState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ReadState] {
        match self {
            Self::Unread => &[Self::Read],
            Self::Read => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl From<bool> for ReadState {
    fn from(read: bool) -> Self {
        if read {
            Self::Read
        } else {
            Self::Unread
        }
    }
}

impl std::fmt::Display for ReadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unread => write!(f, "unread"),
            Self::Read => write!(f, "read"),
        }
    }
}

/// Events that trigger read state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadEvent {
    /// The other participant opened the conversation
    MarkRead,
}

impl std::fmt::Display for ReadEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarkRead => write!(f, "mark_read"),
        }
    }
}

pub struct ReadStateMachine;

impl ReadStateMachine {
    /// Attempt a state transition
    pub fn transition(current: ReadState, event: ReadEvent) -> Result<ReadState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        match (current, event) {
            (ReadState::Unread, ReadEvent::MarkRead) => Ok(ReadState::Read),
            (from, event) => Err(StateError::invalid_transition(from, "unknown", event)),
        }
    }
}
