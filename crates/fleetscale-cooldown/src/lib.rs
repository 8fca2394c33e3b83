//! fleetscale-cooldown — durable per-app last-scale-up/down timestamps.
//!
//! The decision engine consults this store to decide whether a
//! scale-down is currently suppressed. See [`store::CooldownStore`] for
//! the missing-cooldown policy that protects against thrash after a
//! restart.

pub mod error;
pub mod store;
mod tables;

pub use error::{CooldownError, CooldownResult};
pub use store::{CooldownStore, InMemoryCooldownStore, RedbCooldownStore};
