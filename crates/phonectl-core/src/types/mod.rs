//! Type definitions
//!
//! - DeviceAction: a single low-level operation executable by the companion app
//! - Command: a planned user instruction with its ordered action sequence
//! - Pairing: device registration record, independent of command flow
//! - StatusEvent: append-only execution outcome reported by a device

mod action;
mod command;
mod intent;
mod pairing;
mod status_event;

pub use action::{ActionKind, ActionStatus, DeviceAction};
pub use command::{Command, CommandId, CommandStatus};
pub use intent::Intent;
pub use pairing::Pairing;
pub use status_event::StatusEvent;
