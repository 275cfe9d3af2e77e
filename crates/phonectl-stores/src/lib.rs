//! # Phonectl Stores
//!
//! Store implementations for the phone control agent backend:
//! - In-memory stores for development and testing
//! - Redis stores for production persistence
//!
//! Traits live in phonectl-core; this crate only supplies backends.

mod command_store;
mod pairing_store;
mod status_store;

pub use command_store::{InMemoryCommandStore, RedisCommandStore};
pub use pairing_store::{InMemoryPairingStore, RedisPairingStore};
pub use status_store::{InMemoryStatusStore, RedisStatusStore};
