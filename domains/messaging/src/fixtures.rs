//! Demo conversation for local runs and tests
//!
//! Compiled only with the `test-support` feature.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{Conversation, Message, SenderRole};
use crate::error::Result;
use crate::persistence::ChatSnapshot;
use crate::store::MessagingStore;

pub const FIXTURE_CONVERSATION_ID: &str = "conv_1";
pub const FIXTURE_PATIENT_ID: &str = "1";
pub const FIXTURE_PATIENT_NAME: &str = "John Doe";
pub const FIXTURE_DOCTOR_ID: &str = "2";
pub const FIXTURE_DOCTOR_NAME: &str = "Dr. Sarah Smith";

/// (sender role, content, milliseconds before now)
const SCRIPT: [(SenderRole, &str, i64); 5] = [
    (
        SenderRole::Patient,
        "Hello Dr. Smith, I have a question about my recent blood test results.",
        7_200_000,
    ),
    (
        SenderRole::Doctor,
        "Hello John! I'd be happy to help. What would you like to know about your results?",
        5_400_000,
    ),
    (
        SenderRole::Patient,
        "My cholesterol levels seem a bit high. Should I be concerned?",
        4_500_000,
    ),
    (
        SenderRole::Doctor,
        "Your cholesterol is slightly elevated, but not in the danger zone. I recommend some dietary adjustments and we'll monitor it in 3 months.",
        3_700_000,
    ),
    (
        SenderRole::Patient,
        "Thank you for the clarification, Doctor.",
        3_600_000,
    ),
];

/// Build the demo state relative to `now`
pub fn fixture_snapshot(now: DateTime<Utc>) -> ChatSnapshot {
    let messages: Vec<Message> = SCRIPT
        .iter()
        .enumerate()
        .map(|(i, (role, content, ago_ms))| {
            let (sender_id, sender_name) = match role {
                SenderRole::Patient => (FIXTURE_PATIENT_ID, FIXTURE_PATIENT_NAME),
                SenderRole::Doctor => (FIXTURE_DOCTOR_ID, FIXTURE_DOCTOR_NAME),
            };
            Message {
                id: format!("msg_{}", i + 1),
                conversation_id: FIXTURE_CONVERSATION_ID.to_string(),
                sender_id: sender_id.to_string(),
                sender_name: sender_name.to_string(),
                sender_role: *role,
                content: content.to_string(),
                timestamp: now - Duration::milliseconds(*ago_ms),
                read: true,
            }
        })
        .collect();

    let last = messages.last();
    let conversation = Conversation {
        id: FIXTURE_CONVERSATION_ID.to_string(),
        patient_id: FIXTURE_PATIENT_ID.to_string(),
        patient_name: FIXTURE_PATIENT_NAME.to_string(),
        doctor_id: FIXTURE_DOCTOR_ID.to_string(),
        doctor_name: FIXTURE_DOCTOR_NAME.to_string(),
        last_message: last.map(|m| m.content.clone()),
        last_message_time: last.map(|m| m.timestamp),
        unread_count: 0,
    };

    ChatSnapshot {
        conversations: vec![conversation],
        messages,
    }
}

impl MessagingStore {
    /// Replace all state with the demo conversation and persist it
    #[mutants::skip] // Thin wrapper over fixture_snapshot, which is tested directly
    pub fn seed_fixture_data(&mut self) -> Result<()> {
        self.replace_state(fixture_snapshot(Utc::now()))?;
        tracing::info!(
            conversation_id = FIXTURE_CONVERSATION_ID,
            messages = SCRIPT.len(),
            "Seeded fixture conversation"
        );
        Ok(())
    }
}
