//! Outbox module
//!
//! The outbox is the per-device queue of not-yet-delivered actions, derived
//! on demand from stored commands. Selection policy:
//! - Commands are visited newest-first (reverse of insertion order)
//! - Within a command, actions keep their stored order
//! - Only pending/sent actions qualify; executed/failed are skipped
//! - Collection stops at the caller-supplied limit, possibly mid-command
//!
//! The policy is a pure function; the atomic pending -> sent claim happens
//! inside the store (`CommandStore::claim_pending`).

use serde::{Deserialize, Serialize};

use crate::types::{Command, DeviceAction};

/// An action handed to a device, with enough context to report status back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulledAction {
    /// Owning command
    pub command_id: String,
    /// Position of the action within its command's action list
    pub action_index: usize,
    /// The action itself
    pub action: DeviceAction,
}

/// Select up to `limit` deliverable actions from `commands`
///
/// `commands` must be in insertion order; the newest command is served
/// first. A limit of zero yields nothing.
pub fn select_pending(commands: &[Command], limit: usize) -> Vec<PulledAction> {
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }
    for command in commands.iter().rev() {
        for (action_index, action) in command.actions.iter().enumerate() {
            if action.status.is_deliverable() {
                out.push(PulledAction {
                    command_id: command.id.clone(),
                    action_index,
                    action: action.clone(),
                });
                if out.len() >= limit {
                    return out;
                }
            }
        }
    }
    out
}
