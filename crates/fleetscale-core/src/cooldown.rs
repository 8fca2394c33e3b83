//! Cooldown record types shared between the decision engine and every
//! `CooldownStore` implementation.

use serde::{Deserialize, Serialize};

/// Which kind of scale event a cooldown record tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownKind {
    Up,
    Down,
}

impl CooldownKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CooldownKind::Up => "last_scale_up",
            CooldownKind::Down => "last_scale_down",
        }
    }
}

/// A single `(app_name, kind)` → timestamp record.
///
/// `timestamp` is UTC epoch seconds of the most recent scale event of
/// that kind. A missing record (no `CooldownRecord` for a given key)
/// means "no prior event" — see `fleetscale-cooldown`'s missing-cooldown
/// policy for how callers should treat that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownRecord {
    pub timestamp: u64,
}
