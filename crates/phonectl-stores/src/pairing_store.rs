//! PairingStore implementations

use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::RwLock;

use phonectl_core::store::{PairingStore, StoreError};
use phonectl_core::types::Pairing;

/// In-memory implementation for development and testing
pub struct InMemoryPairingStore {
    pairings: RwLock<Vec<Pairing>>,
}

impl InMemoryPairingStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            pairings: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPairingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PairingStore for InMemoryPairingStore {
    async fn save(&self, pairing: &Pairing) -> Result<(), StoreError> {
        let mut pairings = self
            .pairings
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        pairings.push(pairing.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Pairing>, StoreError> {
        let pairings = self
            .pairings
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(pairings.clone())
    }
}

/// Redis implementation for production persistence.
pub struct RedisPairingStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisPairingStore {
    /// Create a new Redis pairing store from a connection URL.
    pub fn new(connection_url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_url)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
        })
    }

    fn pairings_key(&self) -> String {
        format!("{}:pairing:log", self.key_prefix)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    async fn load_all(&self) -> Result<Vec<Pairing>, StoreError> {
        let mut conn = self.connection().await?;
        let payloads: Vec<String> = conn
            .lrange(self.pairings_key(), 0, -1)
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

#[async_trait]
impl PairingStore for RedisPairingStore {
    async fn save(&self, pairing: &Pairing) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(pairing)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        conn.rpush::<_, _, ()>(self.pairings_key(), payload)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Pairing>, StoreError> {
        self.load_all().await
    }
}
