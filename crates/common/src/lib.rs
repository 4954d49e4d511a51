//! Shared configuration and error handling for CareLink
//!
//! This crate provides common functionality used across the CareLink workspace:
//! - Configuration loaded from the environment
//! - Error types and handling
//! - State machine errors shared by domain crates

pub mod config;
pub mod error;
pub mod state;

pub use config::{Config, StorageProvider, ValidationMode};
pub use error::{Error, Result};
pub use state::StateError;
