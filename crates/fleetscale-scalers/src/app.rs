//! `App` — a configured application and its ordered scalers.

use thiserror::Error;

use fleetscale_core::ObservedApp;

use crate::scaler::Scaler;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("app {name:?} has no scalers configured")]
    NoScalers { name: String },

    #[error("app {name:?} has max_instances ({max}) < min_instances ({min})")]
    BoundsInverted { name: String, min: u32, max: u32 },
}

/// A configured application: a name, instance bounds, and the ordered
/// scalers that estimate its desired instance count. Immutable after
/// construction apart from the transient [`ObservedApp`] snapshot bound
/// each tick from the PaaS inventory.
pub struct App {
    pub name: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub scalers: Vec<Scaler>,
    pub observed: Option<ObservedApp>,
}

impl App {
    pub fn new(name: impl Into<String>, min_instances: u32, max_instances: u32, scalers: Vec<Scaler>) -> Result<Self, AppConfigError> {
        let name = name.into();

        if max_instances < min_instances {
            return Err(AppConfigError::BoundsInverted { name, min: min_instances, max: max_instances });
        }
        if scalers.is_empty() {
            return Err(AppConfigError::NoScalers { name });
        }

        Ok(Self {
            name,
            min_instances,
            max_instances,
            scalers,
            observed: None,
        })
    }

    /// Bind this tick's PaaS-observed `{guid, instances}` snapshot.
    pub fn bind_observed(&mut self, observed: ObservedApp) {
        self.observed = Some(observed);
    }

    /// Desired instance count across every scaler: the `max` of their
    /// individually clamped outputs. Scalers are polled in configured
    /// order; `max` is commutative so ordering only affects metric
    /// side-effects, not this result.
    pub async fn get_desired_instance_count(&self) -> u32 {
        let mut highest = self.min_instances;
        for scaler in &self.scalers {
            highest = highest.max(scaler.get_desired_instance_count().await);
        }
        highest
    }
}
