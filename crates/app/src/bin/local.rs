// CareLink - Local messaging store runner

use tracing::{error, info};

use carelink_common::Config;
use carelink_messaging::UserRole;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.rust_log)),
        )
        .pretty()
        .init();

    info!("Starting CareLink messaging store");

    let store = carelink_app::create_store(&config).map_err(|e| {
        error!("Failed to open messaging store: {}", e);
        e
    })?;

    let snapshot = store.snapshot();
    info!(
        conversations = snapshot.conversations.len(),
        messages = snapshot.messages.len(),
        "Messaging store ready"
    );

    for conv in &snapshot.conversations {
        info!(
            conversation_id = %conv.id,
            patient = %conv.patient_name,
            doctor = %conv.doctor_name,
            unread_count = conv.unread_count,
            last_message = conv.last_message.as_deref().unwrap_or(""),
            "Conversation"
        );
    }

    let mut patients: Vec<&str> = snapshot
        .conversations
        .iter()
        .map(|c| c.patient_id.as_str())
        .collect();
    patients.sort_unstable();
    patients.dedup();
    for patient_id in patients {
        info!(
            user_id = patient_id,
            unread_total = store.unread_total(patient_id, UserRole::Patient),
            "Patient inbox"
        );
    }

    let mut doctors: Vec<&str> = snapshot
        .conversations
        .iter()
        .map(|c| c.doctor_id.as_str())
        .collect();
    doctors.sort_unstable();
    doctors.dedup();
    for doctor_id in doctors {
        info!(
            user_id = doctor_id,
            unread_total = store.unread_total(doctor_id, UserRole::Doctor),
            "Doctor inbox"
        );
    }

    Ok(())
}
