//! Store invariants under longer operation sequences
//!
//! Each test drives a scripted sequence and checks the invariants after every
//! step rather than only at the end.

use carelink_messaging::{ChatSnapshot, MessagingStore, SenderRole};

use crate::common::{start, TestApp};

/// Operations in a scripted run
#[derive(Debug, Clone, Copy)]
enum Op {
    PatientSends,
    DoctorSends,
    PatientReads,
    DoctorReads,
}

const SCRIPT: [Op; 12] = [
    Op::PatientSends,
    Op::PatientSends,
    Op::DoctorReads,
    Op::DoctorSends,
    Op::DoctorSends,
    Op::DoctorSends,
    Op::PatientSends,
    Op::PatientReads,
    Op::PatientReads,
    Op::DoctorSends,
    Op::DoctorReads,
    Op::PatientSends,
];

fn apply(store: &mut MessagingStore, conv_id: &str, op: Op, step: usize) {
    let text = format!("step {}", step);
    match op {
        Op::PatientSends => {
            store
                .append_message(conv_id, &text, "p1", "Pat", SenderRole::Patient)
                .unwrap();
        }
        Op::DoctorSends => {
            store
                .append_message(conv_id, &text, "d1", "Doc", SenderRole::Doctor)
                .unwrap();
        }
        Op::PatientReads => store.mark_as_read(conv_id, "p1").unwrap(),
        Op::DoctorReads => store.mark_as_read(conv_id, "d1").unwrap(),
    }
}

/// Messages are only ever appended, and only the read flag may change
fn assert_append_only(before: &ChatSnapshot, after: &ChatSnapshot) {
    assert!(after.messages.len() >= before.messages.len());
    for (old, new) in before.messages.iter().zip(after.messages.iter()) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.content, new.content);
        assert_eq!(old.sender_id, new.sender_id);
        assert_eq!(old.timestamp, new.timestamp);
        assert!(new.read || !old.read, "a read message became unread");
    }
}

#[test]
fn test_counter_matches_appends_since_last_read() {
    let app = TestApp::new().unwrap();
    let mut store = app.open_store().unwrap();
    let conv = start(&mut store, "p1", "d1");

    let mut expected_unread = 0u32;
    for (step, op) in SCRIPT.iter().enumerate() {
        let before = store.snapshot();
        apply(&mut store, &conv.id, *op, step);
        let after = store.snapshot();

        expected_unread = match op {
            Op::PatientSends | Op::DoctorSends => expected_unread + 1,
            Op::PatientReads | Op::DoctorReads => 0,
        };

        assert_eq!(
            store.find_conversation(&conv.id).unwrap().unread_count,
            expected_unread,
            "after step {} ({:?})",
            step,
            op
        );
        assert_append_only(&before, &after);
    }
}

#[test]
fn test_last_reader_sees_everything_else_read() {
    let app = TestApp::new().unwrap();
    let mut store = app.open_store().unwrap();
    let conv = start(&mut store, "p1", "d1");

    for (step, op) in SCRIPT.iter().enumerate() {
        apply(&mut store, &conv.id, *op, step);

        let reader = match op {
            Op::PatientReads => "p1",
            Op::DoctorReads => "d1",
            _ => continue,
        };
        for msg in store.conversation_messages(&conv.id) {
            if msg.sender_id != reader {
                assert!(msg.read, "step {}: {} left unread", step, msg.id);
            }
        }
    }
}

#[test]
fn test_last_message_tracks_latest_append() {
    let app = TestApp::new().unwrap();
    let mut store = app.open_store().unwrap();
    let conv = start(&mut store, "p1", "d1");

    for (step, op) in SCRIPT.iter().enumerate() {
        apply(&mut store, &conv.id, *op, step);

        let messages = store.conversation_messages(&conv.id);
        let summary = store.find_conversation(&conv.id).unwrap();
        match messages.last() {
            Some(latest) => {
                assert_eq!(summary.last_message.as_deref(), Some(latest.content.as_str()));
                assert_eq!(summary.last_message_time, Some(latest.timestamp));
            }
            None => assert!(summary.last_message.is_none()),
        }
    }
}

#[test]
fn test_participants_never_change() {
    let app = TestApp::new().unwrap();
    let mut store = app.open_store().unwrap();
    let conv = start(&mut store, "p1", "d1");

    for (step, op) in SCRIPT.iter().enumerate() {
        apply(&mut store, &conv.id, *op, step);
    }

    let end = store.find_conversation(&conv.id).unwrap();
    assert_eq!(end.patient_id, conv.patient_id);
    assert_eq!(end.patient_name, conv.patient_name);
    assert_eq!(end.doctor_id, conv.doctor_id);
    assert_eq!(end.doctor_name, conv.doctor_name);
}
