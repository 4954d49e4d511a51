//! Snapshot persistence across restarts

use std::fs;

use carelink_messaging::fixtures::FIXTURE_CONVERSATION_ID;
use carelink_messaging::{ChatSnapshot, MessagingError, SenderRole, SNAPSHOT_VERSION};
use carelink_storage::KeyValueStore;

use crate::common::{start, TestApp};

#[test]
fn test_restart_reproduces_state_exactly() {
    let app = TestApp::new().unwrap();
    let before = {
        let mut store = app.seeded_store().unwrap();
        let conv = start(&mut store, "p9", "d9");
        store
            .append_message(&conv.id, "first", "p9", "Pat", SenderRole::Patient)
            .unwrap();
        store
            .append_message(&conv.id, "second", "d9", "Doc", SenderRole::Doctor)
            .unwrap();
        store.mark_as_read(&conv.id, "d9").unwrap();
        store
            .append_message(FIXTURE_CONVERSATION_ID, "ping", "1", "John Doe", SenderRole::Patient)
            .unwrap();
        store.snapshot()
    };

    let after = app.open_store().unwrap().snapshot();

    assert_eq!(after, before);
    for (a, b) in after.messages.iter().zip(before.messages.iter()) {
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.read, b.read);
    }
    for (a, b) in after.conversations.iter().zip(before.conversations.iter()) {
        assert_eq!(a.unread_count, b.unread_count);
        assert_eq!(a.last_message_time, b.last_message_time);
    }
}

#[test]
fn test_snapshot_file_has_browser_shape() {
    let app = TestApp::new().unwrap();
    app.seeded_store().unwrap();

    let raw = fs::read_to_string(app.snapshot_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["version"], SNAPSHOT_VERSION);
    let conv = &value["state"]["conversations"][0];
    for field in [
        "id",
        "patientId",
        "patientName",
        "doctorId",
        "doctorName",
        "lastMessage",
        "lastMessageTime",
        "unreadCount",
    ] {
        assert!(conv.get(field).is_some(), "conversation missing {}", field);
    }
    let msg = &value["state"]["messages"][0];
    for field in [
        "id",
        "conversationId",
        "senderId",
        "senderName",
        "senderRole",
        "content",
        "timestamp",
        "read",
    ] {
        assert!(msg.get(field).is_some(), "message missing {}", field);
    }
}

#[test]
fn test_every_mutation_is_saved() {
    let app = TestApp::new().unwrap();
    let mut store = app.open_store().unwrap();
    let backend = app.backend().unwrap();
    let key = app.config.storage_key.clone();

    let conv = start(&mut store, "p1", "d1");
    let saved = ChatSnapshot::from_json(&backend.get(&key).unwrap().unwrap()).unwrap();
    assert_eq!(saved.conversations.len(), 1);

    store
        .append_message(&conv.id, "hi", "p1", "Pat", SenderRole::Patient)
        .unwrap();
    let saved = ChatSnapshot::from_json(&backend.get(&key).unwrap().unwrap()).unwrap();
    assert_eq!(saved.messages.len(), 1);
    assert_eq!(saved.conversations[0].unread_count, 1);

    store.mark_as_read(&conv.id, "d1").unwrap();
    let saved = ChatSnapshot::from_json(&backend.get(&key).unwrap().unwrap()).unwrap();
    assert!(saved.messages[0].read);
    assert_eq!(saved.conversations[0].unread_count, 0);
}

#[test]
fn test_browser_written_snapshot_loads() {
    let app = TestApp::new().unwrap();
    fs::create_dir_all(app.data_dir()).unwrap();
    fs::write(
        app.snapshot_path(),
        r#"{"state":{"conversations":[{"id":"conv_1","patientId":"1","patientName":"John Doe",
            "doctorId":"2","doctorName":"Dr. Sarah Smith","lastMessage":"Thanks",
            "lastMessageTime":"2025-01-10T08:00:00.000Z","unreadCount":2}],
            "messages":[{"id":"msg_1","conversationId":"conv_1","senderId":"1",
            "senderName":"John Doe","senderRole":"patient","content":"Thanks",
            "timestamp":"2025-01-10T08:00:00.000Z","read":false}]},"version":0}"#,
    )
    .unwrap();

    let store = app.open_store().unwrap();
    assert_eq!(store.conversation_messages("conv_1").len(), 1);
    assert_eq!(store.find_conversation("conv_1").unwrap().unread_count, 2);
}

#[test]
fn test_corrupt_snapshot_fails_open() {
    let app = TestApp::new().unwrap();
    fs::create_dir_all(app.data_dir()).unwrap();
    fs::write(app.snapshot_path(), "{ not json").unwrap();

    let err = app.open_store().unwrap_err();
    let messaging = err.downcast_ref::<MessagingError>().unwrap();
    assert!(matches!(messaging, MessagingError::Snapshot(_)));
}

#[test]
fn test_future_version_fails_open() {
    let app = TestApp::new().unwrap();
    fs::create_dir_all(app.data_dir()).unwrap();
    fs::write(
        app.snapshot_path(),
        r#"{"state":{"conversations":[],"messages":[]},"version":1}"#,
    )
    .unwrap();

    let err = app.open_store().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MessagingError>(),
        Some(MessagingError::UnsupportedSnapshotVersion { found: 1, .. })
    ));
}
