//! Domain entities for the messaging domain
//!
//! Messages are immutable records apart from their read flag. Conversations
//! are the per-thread aggregate between one patient and one doctor, carrying a
//! denormalized copy of the latest message and a running unread counter.
//!
//! Field names serialize in camelCase because the persisted snapshot shape is
//! shared with the browser client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::state::{ReadEvent, ReadState, ReadStateMachine, StateError};
use crate::error::{MessagingError, Result};

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    Patient,
    Doctor,
}

impl std::fmt::Display for SenderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenderRole::Patient => write!(f, "patient"),
            SenderRole::Doctor => write!(f, "doctor"),
        }
    }
}

/// Role of a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
    Admin,
}

impl UserRole {
    /// The role this user writes messages as, if they take part in messaging at all
    pub fn sender_role(&self) -> Option<SenderRole> {
        match self {
            UserRole::Patient => Some(SenderRole::Patient),
            UserRole::Doctor => Some(SenderRole::Doctor),
            UserRole::Admin => None,
        }
    }
}

impl From<SenderRole> for UserRole {
    fn from(role: SenderRole) -> Self {
        match role {
            SenderRole::Patient => UserRole::Patient,
            SenderRole::Doctor => UserRole::Doctor,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Patient => write!(f, "patient"),
            UserRole::Doctor => write!(f, "doctor"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = carelink_common::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "patient" => Ok(UserRole::Patient),
            "doctor" => Ok(UserRole::Doctor),
            "admin" => Ok(UserRole::Admin),
            other => Err(carelink_common::Error::Validation(format!(
                "Unknown role '{}'",
                other
            ))),
        }
    }
}

/// A signed-in user as seen by the messaging domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub role: UserRole,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    pub fn patient(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, UserRole::Patient)
    }

    pub fn doctor(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, UserRole::Doctor)
    }
}

/// Caller-supplied fields of a message; the store assigns id, timestamp and read flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub conversation_id: String,
    pub content: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_role: SenderRole,
}

impl NewMessage {
    pub fn new(
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        sender_role: SenderRole,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            content: content.into(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            sender_role,
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_role: SenderRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Message {
    /// Build an unread message from a draft
    pub fn new(draft: NewMessage, timestamp: DateTime<Utc>) -> Self {
        Message {
            id: format!("msg_{}", Uuid::new_v4().simple()),
            conversation_id: draft.conversation_id,
            sender_id: draft.sender_id,
            sender_name: draft.sender_name,
            sender_role: draft.sender_role,
            content: draft.content,
            timestamp,
            read: false,
        }
    }

    pub fn read_state(&self) -> ReadState {
        ReadState::from(self.read)
    }

    /// Flip the read flag through the read state machine
    pub fn mark_read(&mut self) -> std::result::Result<(), StateError> {
        let next = ReadStateMachine::transition(self.read_state(), ReadEvent::MarkRead)?;
        self.read = next == ReadState::Read;
        Ok(())
    }

    /// Content must contain something other than whitespace; it is stored as given
    pub fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(MessagingError::InvalidContent);
        }
        Ok(())
    }
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<DateTime<Utc>>,
    pub unread_count: u32,
}

impl Conversation {
    /// Create an empty conversation between a patient and a doctor
    pub fn new(patient: &Participant, doctor: &Participant) -> Result<Self> {
        if patient.role != UserRole::Patient {
            return Err(MessagingError::InvalidParticipants(format!(
                "{} is a {}, expected a patient",
                patient.id, patient.role
            )));
        }
        if doctor.role != UserRole::Doctor {
            return Err(MessagingError::InvalidParticipants(format!(
                "{} is a {}, expected a doctor",
                doctor.id, doctor.role
            )));
        }
        if patient.id == doctor.id {
            return Err(MessagingError::InvalidParticipants(
                "Patient and doctor must be different users".to_string(),
            ));
        }

        Ok(Conversation {
            id: format!("conv_{}", Uuid::new_v4().simple()),
            patient_id: patient.id.clone(),
            patient_name: patient.name.clone(),
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            last_message: None,
            last_message_time: None,
            unread_count: 0,
        })
    }

    /// Fold a newly appended message into the summary.
    ///
    /// The unread counter goes up for every message, the sender's own included.
    pub fn record_message(&mut self, message: &Message) {
        self.last_message = Some(message.content.clone());
        self.last_message_time = Some(message.timestamp);
        self.unread_count = self.unread_count.saturating_add(1);
    }

    pub fn reset_unread(&mut self) {
        self.unread_count = 0;
    }

    /// Whether `user_id` sees this conversation when signed in with `role`
    pub fn is_visible_to(&self, user_id: &str, role: UserRole) -> bool {
        match role {
            UserRole::Patient => self.patient_id == user_id,
            UserRole::Doctor => self.doctor_id == user_id,
            UserRole::Admin => false,
        }
    }

    /// Name of the other side, as shown to a patient or a doctor
    pub fn counterpart_name(&self, role: UserRole) -> Option<&str> {
        match role {
            UserRole::Patient => Some(&self.doctor_name),
            UserRole::Doctor => Some(&self.patient_name),
            UserRole::Admin => None,
        }
    }
}
