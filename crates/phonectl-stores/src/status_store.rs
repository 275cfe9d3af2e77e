//! StatusStore implementations

use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::RwLock;

use phonectl_core::store::{StatusStore, StoreError};
use phonectl_core::types::StatusEvent;

/// In-memory implementation for development and testing
pub struct InMemoryStatusStore {
    events: RwLock<Vec<StatusEvent>>,
}

impl InMemoryStatusStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn append(&self, event: StatusEvent) -> Result<(), StoreError> {
        let mut events = self
            .events
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        events.push(event);
        Ok(())
    }

    async fn list_for_device(&self, device_id: &str) -> Result<Vec<StatusEvent>, StoreError> {
        let events = self
            .events
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(events
            .iter()
            .filter(|e| e.device_id == device_id)
            .cloned()
            .collect())
    }
}

/// Redis implementation for append-only status persistence.
pub struct RedisStatusStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisStatusStore {
    /// Create a new Redis status store from a connection URL.
    pub fn new(connection_url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_url)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
        })
    }

    fn device_log_key(&self, device_id: &str) -> String {
        format!("{}:device:{}:status", self.key_prefix, device_id)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn append(&self, event: StatusEvent) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(&event)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        conn.rpush::<_, _, ()>(self.device_log_key(&event.device_id), payload)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn list_for_device(&self, device_id: &str) -> Result<Vec<StatusEvent>, StoreError> {
        let mut conn = self.connection().await?;
        let payloads: Vec<String> = conn
            .lrange(self.device_log_key(device_id), 0, -1)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        payloads
            .iter()
            .map(|p| {
                serde_json::from_str(p).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}
