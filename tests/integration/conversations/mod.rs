//! Conversation visibility and participant sessions

use carelink_messaging::fixtures::{
    FIXTURE_CONVERSATION_ID, FIXTURE_DOCTOR_ID, FIXTURE_DOCTOR_NAME, FIXTURE_PATIENT_ID,
    FIXTURE_PATIENT_NAME,
};
use carelink_messaging::{MessagingError, Participant, ParticipantSession, UserRole};

use crate::common::{doctor, patient, start, TestApp};

mod test_user_conversations {
    use super::*;

    #[test]
    fn test_role_scoped_visibility() {
        let app = TestApp::new().unwrap();
        let mut store = app.open_store().unwrap();

        let a = start(&mut store, "p1", "d1");
        let b = start(&mut store, "p2", "d1");
        let c = start(&mut store, "p1", "d2");

        let ids = |user: &str, role: UserRole| -> Vec<String> {
            store
                .user_conversations(user, role)
                .into_iter()
                .map(|c| c.id)
                .collect()
        };

        assert_eq!(ids("p1", UserRole::Patient), vec![a.id.clone(), c.id.clone()]);
        assert_eq!(ids("d1", UserRole::Doctor), vec![a.id.clone(), b.id.clone()]);
        assert_eq!(ids("d2", UserRole::Doctor), vec![c.id]);
        assert!(ids("p1", UserRole::Doctor).is_empty());
        assert!(ids("d1", UserRole::Patient).is_empty());
        assert!(ids("p1", UserRole::Admin).is_empty());
        assert!(ids("d1", UserRole::Admin).is_empty());
    }

    #[test]
    fn test_insertion_order_not_recency() {
        let app = TestApp::new().unwrap();
        let mut store = app.open_store().unwrap();

        let older = start(&mut store, "p1", "d1");
        let newer = start(&mut store, "p1", "d2");

        // Activity on the older conversation does not move it
        store
            .append_message(
                &older.id,
                "bump",
                "p1",
                "Pat",
                carelink_messaging::SenderRole::Patient,
            )
            .unwrap();

        let listed: Vec<String> = store
            .user_conversations("p1", UserRole::Patient)
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(listed, vec![older.id, newer.id]);
    }

    #[test]
    fn test_unknown_role_string_rejected_before_lookup() {
        assert!("nurse".parse::<UserRole>().is_err());
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    }

    #[test]
    fn test_counterpart_names_for_fixture() {
        let app = TestApp::new().unwrap();
        let store = app.seeded_store().unwrap();
        let conv = store.find_conversation(FIXTURE_CONVERSATION_ID).unwrap();

        assert_eq!(
            conv.counterpart_name(UserRole::Patient),
            Some(FIXTURE_DOCTOR_NAME)
        );
        assert_eq!(
            conv.counterpart_name(UserRole::Doctor),
            Some(FIXTURE_PATIENT_NAME)
        );
    }
}

mod test_sessions {
    use super::*;

    #[test]
    fn test_full_exchange_between_patient_and_doctor() {
        let app = TestApp::new().unwrap();
        let mut store = app.open_store().unwrap();
        let conv = store
            .start_conversation(&patient("p1"), &doctor("d1"))
            .unwrap();

        {
            let mut pat = ParticipantSession::new(&mut store, patient("p1"));
            pat.send(&conv.id, "Are my results back?").unwrap();
        }

        {
            let mut doc = ParticipantSession::new(&mut store, doctor("d1"));
            assert_eq!(doc.unread_total(), 1);
            let thread = doc.open(&conv.id).unwrap();
            assert_eq!(thread.len(), 1);
            assert!(thread[0].read);
            doc.send(&conv.id, "Yes, all within range.").unwrap();
        }

        let mut pat = ParticipantSession::new(&mut store, patient("p1"));
        assert_eq!(pat.unread_total(), 1);
        let thread = pat.open(&conv.id).unwrap();
        assert_eq!(thread.len(), 2);
        assert!(thread[1].read);
        assert_eq!(pat.unread_total(), 0);
    }

    #[test]
    fn test_admin_session_sees_and_sends_nothing() {
        let app = TestApp::new().unwrap();
        let mut store = app.seeded_store().unwrap();
        let mut admin =
            ParticipantSession::new(&mut store, Participant::new("99", "Ada", UserRole::Admin));

        assert!(admin.inbox().is_empty());
        assert_eq!(admin.unread_total(), 0);
        assert!(matches!(
            admin.send(FIXTURE_CONVERSATION_ID, "hello"),
            Err(MessagingError::UnsupportedRole(UserRole::Admin))
        ));
        assert!(matches!(
            admin.open(FIXTURE_CONVERSATION_ID),
            Err(MessagingError::ConversationNotFound(_))
        ));
    }

    #[test]
    fn test_session_changes_are_persisted() {
        let app = TestApp::new().unwrap();
        {
            let mut store = app.seeded_store().unwrap();
            let mut john = ParticipantSession::new(
                &mut store,
                Participant::patient(FIXTURE_PATIENT_ID, FIXTURE_PATIENT_NAME),
            );
            john.send(FIXTURE_CONVERSATION_ID, "One more question")
                .unwrap();
        }

        let mut store = app.open_store().unwrap();
        let sarah = ParticipantSession::new(
            &mut store,
            Participant::doctor(FIXTURE_DOCTOR_ID, FIXTURE_DOCTOR_NAME),
        );
        assert_eq!(sarah.unread_total(), 1);
        assert_eq!(sarah.inbox()[0].last_message.as_deref(), Some("One more question"));
    }
}
