//! CareLink Storage
//!
//! Durable key-value slots used to persist whole-state snapshots:
//! - File-backed store, one file per key, for local runs
//! - In-memory store for tests and ephemeral sessions

use std::path::PathBuf;

use carelink_common::{Config, Error, StorageProvider};
use thiserror::Error;

pub mod file;
pub mod mock;

pub use file::FileKeyValueStore;
pub use mock::MemoryKeyValueStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(key) => Error::Validation(format!("Invalid storage key '{}'", key)),
            other => Error::Storage(other.to_string()),
        }
    }
}

/// A named slot holding a string value that survives process restarts
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Drop the value stored under `key`; missing keys are not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Short provider name for logging
    fn provider(&self) -> &'static str;
}

/// Keys double as file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend to use
    pub provider: StorageProvider,
    /// Directory for the file backend
    pub data_dir: PathBuf,
}

impl From<&Config> for StorageConfig {
    fn from(config: &Config) -> Self {
        Self {
            provider: config.storage_provider,
            data_dir: config.data_dir.clone(),
        }
    }
}

/// Storage factory
pub struct StorageFactory;

impl StorageFactory {
    /// Create a key-value store based on configuration
    pub fn create(config: StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
        match config.provider {
            StorageProvider::File => {
                tracing::info!(data_dir = %config.data_dir.display(), "Creating file-backed storage");
                Ok(Box::new(FileKeyValueStore::open(config.data_dir)?))
            }
            StorageProvider::Memory => {
                tracing::info!("Creating in-memory storage, state will not survive restart");
                Ok(Box::new(MemoryKeyValueStore::new()))
            }
        }
    }
}
