//! PairingStore - Device registration persistence trait

use async_trait::async_trait;

use super::StoreError;
use crate::types::Pairing;

/// PairingStore trait - async interface for pairing records
#[async_trait]
pub trait PairingStore: Send + Sync {
    /// Save a pairing record
    async fn save(&self, pairing: &Pairing) -> Result<(), StoreError>;

    /// All pairing records, in insertion order
    async fn list(&self) -> Result<Vec<Pairing>, StoreError>;
}
