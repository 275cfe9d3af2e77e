//! CommandStore implementations

use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::RwLock;

use phonectl_core::outbox::{select_pending, PulledAction};
use phonectl_core::store::{CommandStore, StoreError};
use phonectl_core::types::{ActionStatus, Command};

/// In-memory implementation for development and testing
///
/// Commands are kept in a Vec so insertion order is the listing order.
pub struct InMemoryCommandStore {
    commands: RwLock<Vec<Command>>,
}

impl InMemoryCommandStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            commands: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryCommandStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandStore for InMemoryCommandStore {
    async fn save(&self, command: &Command) -> Result<(), StoreError> {
        let mut commands = self
            .commands
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        if let Some(existing) = commands.iter_mut().find(|c| c.id == command.id) {
            *existing = command.clone();
        } else {
            commands.push(command.clone());
        }
        Ok(())
    }

    async fn load(&self, command_id: &str) -> Result<Option<Command>, StoreError> {
        let commands = self
            .commands
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(commands.iter().find(|c| c.id == command_id).cloned())
    }

    async fn list_for_device(&self, device_id: &str) -> Result<Vec<Command>, StoreError> {
        let commands = self
            .commands
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(commands
            .iter()
            .filter(|c| c.device_id.as_deref() == Some(device_id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Command>, StoreError> {
        let commands = self
            .commands
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(commands.clone())
    }

    async fn claim_pending(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<PulledAction>, StoreError> {
        // Selection and the pending -> sent transition happen under one
        // write lock, so concurrent pulls for the same device cannot both
        // claim a pending action.
        let mut commands = self
            .commands
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let device_commands: Vec<Command> = commands
            .iter()
            .filter(|c| c.device_id.as_deref() == Some(device_id))
            .cloned()
            .collect();
        let mut pulled = select_pending(&device_commands, limit);

        for item in &mut pulled {
            if item.action.status != ActionStatus::Pending {
                continue;
            }
            if let Some(stored) = commands.iter_mut().find(|c| c.id == item.command_id) {
                if let Some(action) = stored.actions.get_mut(item.action_index) {
                    action.status = ActionStatus::Sent;
                    stored.touch();
                }
            }
            item.action.status = ActionStatus::Sent;
        }
        Ok(pulled)
    }
}

/// Redis implementation for production persistence.
pub struct RedisCommandStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisCommandStore {
    /// Create a new Redis command store from a connection URL.
    pub fn new(connection_url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_url)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
        })
    }

    fn command_key(&self, command_id: &str) -> String {
        format!("{}:command:{}", self.key_prefix, command_id)
    }

    fn command_ids_key(&self) -> String {
        format!("{}:command:ids", self.key_prefix)
    }

    fn device_commands_key(&self, device_id: &str) -> String {
        format!("{}:device:{}:commands", self.key_prefix, device_id)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    async fn save_with(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        command: &Command,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(command)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let key = self.command_key(&command.id);
        let existed: bool = conn
            .exists(&key)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.set::<_, _, ()>(&key, payload)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if !existed {
            conn.rpush::<_, _, ()>(self.command_ids_key(), &command.id)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            if let Some(device_id) = &command.device_id {
                conn.rpush::<_, _, ()>(self.device_commands_key(device_id), &command.id)
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
            }
        }
        Ok(())
    }

    async fn load_by_ids(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        ids: Vec<String>,
    ) -> Result<Vec<Command>, StoreError> {
        let mut out = Vec::new();
        for id in ids {
            let payload: Option<String> = conn
                .get(self.command_key(&id))
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            if let Some(payload) = payload {
                let command: Command = serde_json::from_str(&payload)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                out.push(command);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl CommandStore for RedisCommandStore {
    async fn save(&self, command: &Command) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        self.save_with(&mut conn, command).await
    }

    async fn load(&self, command_id: &str) -> Result<Option<Command>, StoreError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(self.command_key(command_id))
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        payload
            .map(|s| serde_json::from_str(&s).map_err(|e| StoreError::Serialization(e.to_string())))
            .transpose()
    }

    async fn list_for_device(&self, device_id: &str) -> Result<Vec<Command>, StoreError> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn
            .lrange(self.device_commands_key(device_id), 0, -1)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        self.load_by_ids(&mut conn, ids).await
    }

    async fn list_all(&self) -> Result<Vec<Command>, StoreError> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn
            .lrange(self.command_ids_key(), 0, -1)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        self.load_by_ids(&mut conn, ids).await
    }

    async fn claim_pending(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<PulledAction>, StoreError> {
        // Read-modify-write on one connection. Not atomic across processes;
        // the deployment assumes a single writer per device.
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn
            .lrange(self.device_commands_key(device_id), 0, -1)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let mut commands = self.load_by_ids(&mut conn, ids).await?;
        let mut pulled = select_pending(&commands, limit);

        for item in &mut pulled {
            if item.action.status != ActionStatus::Pending {
                continue;
            }
            if let Some(stored) = commands.iter_mut().find(|c| c.id == item.command_id) {
                if let Some(action) = stored.actions.get_mut(item.action_index) {
                    action.status = ActionStatus::Sent;
                    stored.touch();
                }
                let updated = stored.clone();
                self.save_with(&mut conn, &updated).await?;
            }
            item.action.status = ActionStatus::Sent;
        }
        Ok(pulled)
    }
}
