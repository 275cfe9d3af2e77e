//! Command type definitions
//!
//! Command is the persisted record of a planned user instruction: the
//! original text, the classified intent, and the ordered action sequence.
//! Action insertion order is execution order and must survive storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActionStatus, DeviceAction, Intent};

/// Type alias for Command ID
pub type CommandId = String;

/// Command lifecycle, reconciled from action statuses by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Planned,
    InProgress,
    Completed,
    Failed,
}

impl CommandStatus {
    /// Check if the command reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandStatus::Completed | CommandStatus::Failed)
    }
}

/// High-level user command planned into device actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Unique identifier for this command
    pub id: CommandId,
    /// User provided instruction, stored verbatim
    pub text: String,
    /// Opaque language tag passed through by the caller, e.g. "bn", "en"
    #[serde(default)]
    pub language: Option<String>,
    /// Classified intent
    pub intent: Intent,
    /// Planned actions; insertion order is execution order
    pub actions: Vec<DeviceAction>,
    /// Overall command state
    pub status: CommandStatus,
    /// Paired device this command targets, if any
    #[serde(default)]
    pub device_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Command {
    /// Create a new planned command
    pub fn new(text: impl Into<String>, intent: Intent, actions: Vec<DeviceAction>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            language: None,
            intent,
            actions,
            status: CommandStatus::Planned,
            device_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a language tag
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Attach a target device
    pub fn with_device(mut self, device_id: Option<String>) -> Self {
        self.device_id = device_id;
        self
    }

    /// Update the command status
    pub fn set_status(&mut self, status: CommandStatus) {
        self.status = status;
        self.touch();
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Derive the command status from its action statuses
    ///
    /// All executed -> completed; any failed -> failed; any non-pending
    /// action -> in_progress; otherwise planned.
    pub fn reconcile_status(&mut self) {
        let next = if self
            .actions
            .iter()
            .any(|a| a.status == ActionStatus::Failed)
        {
            CommandStatus::Failed
        } else if !self.actions.is_empty()
            && self
                .actions
                .iter()
                .all(|a| a.status == ActionStatus::Executed)
        {
            CommandStatus::Completed
        } else if self
            .actions
            .iter()
            .any(|a| a.status != ActionStatus::Pending)
        {
            CommandStatus::InProgress
        } else {
            CommandStatus::Planned
        };
        if next != self.status {
            self.set_status(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;

    fn sample_command() -> Command {
        Command::new(
            "call to rahim",
            Intent::CallContact,
            vec![
                DeviceAction::with_target(ActionKind::OpenApp, "com.android.dialer"),
                DeviceAction::with_target(ActionKind::Search, "rahim"),
                DeviceAction::with_target(ActionKind::Tap, "call_button"),
            ],
        )
    }

    #[test]
    fn test_new_command_is_planned() {
        let command = sample_command();
        assert_eq!(command.status, CommandStatus::Planned);
        assert!(command.actions.iter().all(|a| a.status == ActionStatus::Pending));
    }

    #[test]
    fn test_reconcile_all_executed_completes() {
        let mut command = sample_command();
        for action in &mut command.actions {
            action.mark(ActionStatus::Executed, None);
        }
        command.reconcile_status();
        assert_eq!(command.status, CommandStatus::Completed);
    }

    #[test]
    fn test_reconcile_any_failed_fails() {
        let mut command = sample_command();
        command.actions[0].mark(ActionStatus::Executed, None);
        command.actions[1].mark(ActionStatus::Failed, Some("not found".to_string()));
        command.reconcile_status();
        assert_eq!(command.status, CommandStatus::Failed);
    }

    #[test]
    fn test_reconcile_partial_progress() {
        let mut command = sample_command();
        command.actions[0].mark(ActionStatus::Sent, None);
        command.reconcile_status();
        assert_eq!(command.status, CommandStatus::InProgress);
    }

    #[test]
    fn test_reconcile_untouched_stays_planned() {
        let mut command = sample_command();
        command.reconcile_status();
        assert_eq!(command.status, CommandStatus::Planned);
    }
}
