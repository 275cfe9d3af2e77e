//! Device action definitions
//!
//! DeviceAction is the unit of work a paired handset pulls and executes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kinds of low-level operations the companion app can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Tap,
    LongPress,
    TypeText,
    Swipe,
    OpenApp,
    Back,
    Home,
    RecentApps,
    Search,
    CallContact,
    SendMessage,
    ToggleWifi,
    ToggleBluetooth,
    OpenUrl,
    Unknown,
}

/// Action delivery/execution lifecycle
///
/// Transitions only move forward: pending -> sent -> executed, or
/// pending/sent -> failed. Re-reporting the current status is accepted
/// as an idempotent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Sent,
    Executed,
    Failed,
}

impl Default for ActionStatus {
    fn default() -> Self {
        ActionStatus::Pending
    }
}

impl ActionStatus {
    /// Check if the action reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionStatus::Executed | ActionStatus::Failed)
    }

    /// Check if the action still qualifies for outbox delivery
    pub fn is_deliverable(&self) -> bool {
        matches!(self, ActionStatus::Pending | ActionStatus::Sent)
    }

    /// Check if moving to `next` respects the forward-only lifecycle
    pub fn can_transition_to(&self, next: ActionStatus) -> bool {
        if *self == next {
            // idempotent re-report
            return true;
        }
        matches!(
            (self, next),
            (ActionStatus::Pending, ActionStatus::Sent)
                | (ActionStatus::Pending, ActionStatus::Executed)
                | (ActionStatus::Pending, ActionStatus::Failed)
                | (ActionStatus::Sent, ActionStatus::Executed)
                | (ActionStatus::Sent, ActionStatus::Failed)
        )
    }
}

/// A single low-level action the device companion app can execute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAction {
    /// What to do
    pub kind: ActionKind,
    /// Target element/app package/URL/search text; semantics depend on `kind`
    #[serde(default)]
    pub target: Option<String>,
    /// Additional arguments like typed text, coordinates, duration
    #[serde(default)]
    pub args: HashMap<String, Value>,
    /// Delivery/execution state
    #[serde(default)]
    pub status: ActionStatus,
    /// Failure detail, set only when status = failed
    #[serde(default)]
    pub error: Option<String>,
}

impl DeviceAction {
    /// Create a new pending action without a target
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            target: None,
            args: HashMap::new(),
            status: ActionStatus::Pending,
            error: None,
        }
    }

    /// Create a new pending action with a target
    pub fn with_target(kind: ActionKind, target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::new(kind)
        }
    }

    /// Attach an argument map
    pub fn with_args(mut self, args: HashMap<String, Value>) -> Self {
        self.args = args;
        self
    }

    /// Apply a reported status. `error` is kept only for failures.
    pub fn mark(&mut self, status: ActionStatus, error: Option<String>) {
        self.status = status;
        self.error = if status == ActionStatus::Failed {
            error
        } else {
            None
        };
    }
}
