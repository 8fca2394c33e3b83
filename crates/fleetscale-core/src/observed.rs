//! The transient per-tick snapshot of an app's state as reported by the PaaS.

use serde::{Deserialize, Serialize};

/// What the PaaS reports about an app at the start of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedApp {
    /// Globally-unique identifier the PaaS uses for scale RPCs.
    pub guid: String,
    /// Current instance count.
    pub instances: u32,
}
