//! Domain layer for messaging

pub mod entities;
pub mod state;
