//! CommandStore - Command persistence trait

use async_trait::async_trait;

use super::StoreError;
use crate::outbox::PulledAction;
use crate::types::Command;

/// CommandStore trait - async interface for command persistence
///
/// Implementations must preserve insertion order in listing operations;
/// action order within a command is execution order.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Save a command (insert or update; updates keep the original position)
    async fn save(&self, command: &Command) -> Result<(), StoreError>;

    /// Load a command by ID
    async fn load(&self, command_id: &str) -> Result<Option<Command>, StoreError>;

    /// Commands targeting a device, in insertion order
    async fn list_for_device(&self, device_id: &str) -> Result<Vec<Command>, StoreError>;

    /// All stored commands, in insertion order
    async fn list_all(&self) -> Result<Vec<Command>, StoreError>;

    /// Select up to `limit` deliverable actions for a device and mark the
    /// claimed pending ones as sent, as one read-modify-write. Returned
    /// actions reflect the post-claim state. Actions already sent are
    /// re-delivered until a terminal status is recorded.
    async fn claim_pending(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<PulledAction>, StoreError>;
}
