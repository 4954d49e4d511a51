//! Common state machine error types
//!
//! Shared across all domain crates that implement state machines.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} to {to} via {event}")]
    InvalidTransition {
        from: String,
        to: String,
        event: String,
    },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl StateError {
    /// Build an invalid-transition error from any displayable state and event
    pub fn invalid_transition(
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
        event: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
            event: event.to_string(),
        }
    }
}
