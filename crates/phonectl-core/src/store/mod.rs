//! Store module
//!
//! This module provides storage abstractions:
//! - CommandStore: planned commands with atomic outbox claiming (async trait)
//! - PairingStore: device registration records (async trait)
//! - StatusStore: append-only status event log (async trait)
//!
//! Note: Implementations are in the phonectl-stores crate

mod command_store;
mod pairing_store;
mod status_store;

pub use command_store::CommandStore;
pub use pairing_store::PairingStore;
pub use status_store::StatusStore;

use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
