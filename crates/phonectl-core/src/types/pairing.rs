//! Pairing type definitions
//!
//! A pairing associates a device identifier with a display name. It is
//! purely informational to the command flow and never mutated by it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device registration record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    /// Unique identifier for this pairing record
    pub id: String,
    /// Device identifier chosen by the companion app
    pub device_id: String,
    /// Human-readable device name
    #[serde(default)]
    pub device_name: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Pairing {
    /// Create a new pairing record
    pub fn new(device_id: impl Into<String>, device_name: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            device_id: device_id.into(),
            device_name,
            created_at: Utc::now(),
        }
    }
}
