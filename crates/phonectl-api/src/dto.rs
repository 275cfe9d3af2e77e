use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use phonectl_core::outbox::PulledAction;
use phonectl_core::types::{
    ActionStatus, Command, CommandStatus, DeviceAction, Intent, Pairing, StatusEvent,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDeviceRequest {
    pub device_id: String,
    pub device_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairAck {
    pub pairing_id: String,
    pub device_id: String,
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingView {
    pub id: String,
    pub device_id: String,
    pub device_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Pairing> for PairingView {
    fn from(pairing: Pairing) -> Self {
        Self {
            id: pairing.id,
            device_id: pairing.device_id,
            device_name: pairing.device_name,
            created_at: pairing.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanCommandRequest {
    pub text: String,
    pub language: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandView {
    pub id: String,
    pub text: String,
    pub language: Option<String>,
    pub intent: Intent,
    pub actions: Vec<DeviceAction>,
    pub status: CommandStatus,
    pub device_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Command> for CommandView {
    fn from(command: Command) -> Self {
        Self {
            id: command.id,
            text: command.text,
            language: command.language,
            intent: command.intent,
            actions: command.actions,
            status: command.status,
            device_id: command.device_id,
            created_at: command.created_at,
            updated_at: command.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullActionsRequest {
    pub device_id: String,
    /// Maximum actions to hand out; the runtime default applies when absent
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulledActionView {
    pub command_id: String,
    pub action_index: usize,
    pub action: DeviceAction,
}

impl From<PulledAction> for PulledActionView {
    fn from(pulled: PulledAction) -> Self {
        Self {
            command_id: pulled.command_id,
            action_index: pulled.action_index,
            action: pulled.action,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStatusRequest {
    pub device_id: String,
    pub action_index: usize,
    pub command_id: Option<String>,
    pub status: ActionStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusAck {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEventView {
    pub id: String,
    pub device_id: String,
    pub command_id: Option<String>,
    pub action_index: usize,
    pub status: ActionStatus,
    pub error: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<StatusEvent> for StatusEventView {
    fn from(event: StatusEvent) -> Self {
        Self {
            id: event.id,
            device_id: event.device_id,
            command_id: event.command_id,
            action_index: event.action_index,
            status: event.status,
            error: event.error,
            recorded_at: event.recorded_at,
        }
    }
}
