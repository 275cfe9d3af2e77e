//! Status event definitions
//!
//! StatusEvent is the append-only record of an execution outcome reported
//! by a device. Events are never updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ActionStatus;

/// Append-only execution outcome record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Unique identifier for this event
    pub id: String,
    /// Reporting device
    pub device_id: String,
    /// Owning command, when the device can correlate the action
    #[serde(default)]
    pub command_id: Option<String>,
    /// Position of the action within its command's action list
    pub action_index: usize,
    /// Reported status
    pub status: ActionStatus,
    /// Failure detail, if any
    #[serde(default)]
    pub error: Option<String>,
    /// Ingestion timestamp
    pub recorded_at: DateTime<Utc>,
}

impl StatusEvent {
    /// Create a new status event
    pub fn new(
        device_id: impl Into<String>,
        command_id: Option<String>,
        action_index: usize,
        status: ActionStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            device_id: device_id.into(),
            command_id,
            action_index,
            status,
            error,
            recorded_at: Utc::now(),
        }
    }
}
