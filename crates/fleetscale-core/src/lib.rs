//! fleetscale-core — shared domain types for the fleetscale autoscaler.
//!
//! Every other crate in this workspace depends on this one. It carries
//! no I/O of its own: a mockable [`Clock`], the [`MetricsSink`] contract,
//! the observed-from-PaaS app snapshot, and cooldown bookkeeping types.

pub mod clock;
pub mod cooldown;
pub mod metrics;
pub mod observed;

pub use clock::{Clock, MockClock, SystemClock};
pub use cooldown::{CooldownKind, CooldownRecord};
pub use metrics::{MetricsSink, NullSink};
pub use observed::ObservedApp;
