//! fleetscale-engine — the decision engine (scale policy and cooldowns)
//! and the periodic scheduler that drives the control loop.

pub mod decision;
pub mod runner;

pub use decision::DecisionEngine;
pub use runner::PeriodicRunner;
