//! `CpuScaler` — desired instance count from summed per-instance CPU usage.

use std::sync::Arc;

use fleetscale_clients::PaasClient;
use tracing::warn;

use crate::base::{ceil_div, ScalerBase};

/// CPU-backed scaler. Sums per-instance CPU percentage across the whole
/// app rather than averaging, so `threshold_pct` has units of total CPU%.
pub struct CpuScaler {
    pub base: ScalerBase,
    pub threshold_pct: f64,
    paas: Arc<dyn PaasClient>,
}

impl CpuScaler {
    pub fn new(base: ScalerBase, threshold_pct: f64, paas: Arc<dyn PaasClient>) -> Self {
        Self { base, threshold_pct, paas }
    }

    pub async fn get_desired_instance_count(&self) -> u32 {
        let stats = match self.paas.get_app_stats(&self.base.app_name).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(app = %self.base.app_name, error = %e, "app-stats fetch failed");
                return self.base.clamp(0);
            }
        };

        let total_pct: f64 = stats.values().sum::<f64>() * 100.0;

        self.base.metrics.gauge(&format!("{}.cpu-percent", self.base.app_name), total_pct);

        self.base.clamp(ceil_div(total_pct, self.threshold_pct))
    }
}
