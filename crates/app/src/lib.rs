//! CareLink application composition root
//!
//! Wires configuration, storage and the messaging store together.

use carelink_common::Config;
use carelink_messaging::{MessagingStore, StoreOptions};
use carelink_storage::{StorageConfig, StorageFactory};

/// Open the messaging store described by `config`.
///
/// With the `demo-fixtures` feature, an empty store is seeded with the demo
/// conversation when `config.seed_fixtures` is set.
pub fn create_store(config: &Config) -> Result<MessagingStore, anyhow::Error> {
    let backend = StorageFactory::create(StorageConfig::from(config))?;

    let mut store = MessagingStore::open(backend, StoreOptions::from(config))?;

    if config.seed_fixtures {
        seed_if_empty(&mut store)?;
    }

    Ok(store)
}

#[cfg(feature = "demo-fixtures")]
fn seed_if_empty(store: &mut MessagingStore) -> Result<(), anyhow::Error> {
    if store.is_empty() {
        store.seed_fixture_data()?;
    } else {
        tracing::info!("Store already has data, skipping fixture seed");
    }
    Ok(())
}

#[cfg(not(feature = "demo-fixtures"))]
fn seed_if_empty(_store: &mut MessagingStore) -> Result<(), anyhow::Error> {
    tracing::warn!("CARELINK_SEED_FIXTURES is set but fixtures are not compiled in");
    Ok(())
}
