//! Status recorder module
//!
//! The recorder ingests execution outcomes reported by devices:
//! - Appends an immutable StatusEvent to the log
//! - When the report names its command, validates the forward-only action
//!   lifecycle, applies the update, and reconciles the command status
//!
//! Reports without a command id are log-only and acknowledged; the device
//! could not correlate the action, so there is nothing safe to mutate.

use std::sync::Arc;

use thiserror::Error;

use crate::store::{CommandStore, StatusStore, StoreError};
use crate::types::{ActionStatus, StatusEvent};

/// Recorder errors
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Action index {index} out of range for command {command_id} ({len} actions)")]
    ActionIndexOutOfRange {
        command_id: String,
        index: usize,
        len: usize,
    },

    #[error(
        "Illegal status transition {from:?} -> {to:?} for action {index} of command {command_id}"
    )]
    IllegalTransition {
        command_id: String,
        index: usize,
        from: ActionStatus,
        to: ActionStatus,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An execution outcome reported by a device
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Reporting device
    pub device_id: String,
    /// Owning command, when the device can correlate the action
    pub command_id: Option<String>,
    /// Position of the action within its command's action list
    pub action_index: usize,
    /// Reported status
    pub status: ActionStatus,
    /// Failure detail, if any
    pub error: Option<String>,
}

/// StatusRecorder - applies device reports to durable state
pub struct StatusRecorder {
    commands: Arc<dyn CommandStore>,
    statuses: Arc<dyn StatusStore>,
}

impl StatusRecorder {
    /// Create a new recorder over the given stores
    pub fn new(commands: Arc<dyn CommandStore>, statuses: Arc<dyn StatusStore>) -> Self {
        Self { commands, statuses }
    }

    /// Record a report. Validation failures reject the report without
    /// appending anything; the log holds accepted facts only.
    pub async fn record(&self, report: StatusReport) -> Result<(), RecordError> {
        if let Some(command_id) = report.command_id.clone() {
            self.apply_to_command(&command_id, &report).await?;
        } else {
            tracing::debug!(
                device_id = %report.device_id,
                action_index = report.action_index,
                "status report without command id, log-only"
            );
        }

        self.statuses
            .append(StatusEvent::new(
                report.device_id.clone(),
                report.command_id.clone(),
                report.action_index,
                report.status,
                report.error.clone(),
            ))
            .await?;

        tracing::info!(
            device_id = %report.device_id,
            command_id = report.command_id.as_deref().unwrap_or("-"),
            action_index = report.action_index,
            status = ?report.status,
            "status recorded"
        );
        Ok(())
    }

    async fn apply_to_command(
        &self,
        command_id: &str,
        report: &StatusReport,
    ) -> Result<(), RecordError> {
        let mut command = self
            .commands
            .load(command_id)
            .await?
            .ok_or_else(|| RecordError::CommandNotFound(command_id.to_string()))?;

        let len = command.actions.len();
        let action = command.actions.get_mut(report.action_index).ok_or(
            RecordError::ActionIndexOutOfRange {
                command_id: command_id.to_string(),
                index: report.action_index,
                len,
            },
        )?;

        if !action.status.can_transition_to(report.status) {
            return Err(RecordError::IllegalTransition {
                command_id: command_id.to_string(),
                index: report.action_index,
                from: action.status,
                to: report.status,
            });
        }

        action.mark(report.status, report.error.clone());
        command.reconcile_status();
        self.commands.save(&command).await?;
        Ok(())
    }
}
