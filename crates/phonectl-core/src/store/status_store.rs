//! StatusStore - Append-only status event log trait

use async_trait::async_trait;

use super::StoreError;
use crate::types::StatusEvent;

/// StatusStore trait - async interface for the execution outcome log
///
/// Events are facts; they are appended and never updated in place.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Append an event
    async fn append(&self, event: StatusEvent) -> Result<(), StoreError>;

    /// Events reported by a device, in append order
    async fn list_for_device(&self, device_id: &str) -> Result<Vec<StatusEvent>, StoreError>;
}
