//! # Phonectl Core
//!
//! Core abstractions and deterministic logic for the phone control agent
//! backend.
//!
//! This crate contains:
//! - DeviceAction / Command / Pairing / StatusEvent definitions
//! - Planner abstraction and the rule-based intent matcher
//! - Outbox selection policy for pull-based delivery
//! - Status recording with forward-only transition enforcement
//! - Store traits (implementations live in phonectl-stores)
//!
//! This crate does NOT care about:
//! - Transport framing (HTTP/JSON)
//! - Which store backend is wired in
//! - How the companion app executes actions on the handset

pub mod outbox;
pub mod planner;
pub mod recorder;
pub mod store;
pub mod types;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::outbox::{select_pending, PulledAction};
    pub use crate::planner::{PlanError, PlanInput, Planner, RulePlanner};
    pub use crate::recorder::{RecordError, StatusRecorder, StatusReport};
    pub use crate::store::{CommandStore, PairingStore, StatusStore, StoreError};
    pub use crate::types::{
        ActionKind, ActionStatus, Command, CommandId, CommandStatus, DeviceAction, Intent, Pairing,
        StatusEvent,
    };
}

// Re-export key types at crate root
pub use outbox::{select_pending, PulledAction};
pub use planner::{PlanError, PlanInput, Planner, RulePlanner};
pub use recorder::{RecordError, StatusRecorder, StatusReport};
pub use store::{CommandStore, PairingStore, StatusStore, StoreError};
pub use types::{ActionKind, ActionStatus, Command, CommandStatus, DeviceAction, Intent};
