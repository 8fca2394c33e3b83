//! The external collaborators that configured scalers are wired against.
//! Bundled into one struct so `main` constructs them once and threads
//! them through config loading without a long parameter list.

use std::sync::Arc;

use fleetscale_clients::{CloudMetricsClient, PaasClient, QueueClient, SqlClient};
use fleetscale_core::{Clock, MetricsSink};

#[derive(Clone)]
pub struct Collaborators {
    pub paas: Arc<dyn PaasClient>,
    pub cloud_metrics: Arc<dyn CloudMetricsClient>,
    pub queue: Arc<dyn QueueClient>,
    pub sql: Arc<dyn SqlClient>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<dyn MetricsSink>,
}
