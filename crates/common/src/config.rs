//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Where the chat snapshot is kept between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    #[default]
    File,
    Memory,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "fs" => Ok(StorageProvider::File),
            "memory" | "mock" => Ok(StorageProvider::Memory),
            other => Err(Error::Validation(format!(
                "Unknown storage provider '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageProvider::File => write!(f, "file"),
            StorageProvider::Memory => write!(f, "memory"),
        }
    }
}

/// How the messaging store treats unknown conversations and blank content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Reject with an explicit error
    #[default]
    Strict,
    /// Accept silently, matching the browser store this replaces
    Legacy,
}

impl FromStr for ValidationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "legacy" => Ok(ValidationMode::Legacy),
            other => Err(Error::Validation(format!(
                "Unknown validation mode '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot storage backend
    pub storage_provider: StorageProvider,

    /// Directory holding file-backed key-value slots
    pub data_dir: PathBuf,

    /// Key-value slot the chat snapshot is written to
    pub storage_key: String,

    /// Messaging validation behavior
    pub validation: ValidationMode,

    /// Populate the demo conversation on startup when the store is empty
    pub seed_fixtures: bool,

    /// Runtime configuration
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_provider: StorageProvider::default(),
            data_dir: PathBuf::from("./data"),
            storage_key: "chat-storage".to_string(),
            validation: ValidationMode::default(),
            seed_fixtures: false,
            rust_log: "carelink=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_provider = match lookup("CARELINK_STORAGE_PROVIDER") {
            Some(value) => value.parse()?,
            None => defaults.storage_provider,
        };

        let validation = match lookup("CARELINK_VALIDATION") {
            Some(value) => value.parse()?,
            None => defaults.validation,
        };

        let storage_key = lookup("CARELINK_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.trim().is_empty() {
            return Err(Error::Validation(
                "CARELINK_STORAGE_KEY cannot be empty".to_string(),
            ));
        }

        let seed_fixtures = match lookup("CARELINK_SEED_FIXTURES") {
            Some(value) => parse_flag("CARELINK_SEED_FIXTURES", &value)?,
            None => defaults.seed_fixtures,
        };

        let config = Self {
            storage_provider,
            data_dir: lookup("CARELINK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key,
            validation,
            seed_fixtures,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        };

        tracing::debug!(
            storage_provider = %config.storage_provider,
            data_dir = %config.data_dir.display(),
            "Configuration resolved"
        );

        Ok(config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::Validation(format!(
            "{} must be true or false, got '{}'",
            name, other
        ))),
    }
}
