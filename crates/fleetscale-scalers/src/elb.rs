//! `ElbScaler` — desired instance count from load-balancer request volume,
//! overridden to `max_instances` whenever the surge queue is nonzero.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use fleetscale_clients::{CloudMetricsClient, Statistic};
use fleetscale_core::Clock;
use tracing::warn;

use crate::base::{ceil_div, ScalerBase};

/// Request-rate scaler backed by a CloudWatch-compatible `RequestCount`
/// metric, with an independent surge-queue override.
pub struct ElbScaler {
    pub base: ScalerBase,
    /// Name of the load balancer whose `RequestCount` drives scaling.
    pub elb_name: String,
    /// Name of the load balancer whose surge-queue length is checked.
    /// Defaults to `elb_name` — see the surge-queue open question.
    pub surge_queue_name: String,
    pub threshold: f64,
    pub window_secs: i64,
    cloud_metrics: Arc<dyn CloudMetricsClient>,
}

impl ElbScaler {
    pub fn new(
        base: ScalerBase,
        elb_name: impl Into<String>,
        surge_queue_name: Option<String>,
        threshold: f64,
        window_secs: i64,
        cloud_metrics: Arc<dyn CloudMetricsClient>,
    ) -> Self {
        let elb_name = elb_name.into();
        let surge_queue_name = surge_queue_name.unwrap_or_else(|| elb_name.clone());
        Self {
            base,
            elb_name,
            surge_queue_name,
            threshold,
            window_secs,
            cloud_metrics,
        }
    }

    pub async fn get_desired_instance_count(&self) -> u32 {
        let end = Utc.timestamp_opt(self.base.clock.now_unix() as i64, 0).unwrap();
        let start = end - ChronoDuration::seconds(self.window_secs);

        let request_raw = self.request_count_estimate(start, end).await;
        let surge_max = self.surge_queue_max(start, end).await;

        self.base.metrics.gauge(&format!("{}.surge-queue", self.base.app_name), surge_max);

        let raw = if surge_max > 0.0 {
            self.base.max_instances as i64
        } else {
            request_raw
        };

        self.base.clamp(raw)
    }

    async fn request_count_estimate(&self, start: chrono::DateTime<Utc>, end: chrono::DateTime<Utc>) -> i64 {
        let mut dims = HashMap::new();
        dims.insert("LoadBalancerName".to_string(), self.elb_name.clone());

        let datapoints = match self
            .cloud_metrics
            .get_metric_statistics("AWS/ELB", "RequestCount", &dims, start, end, 60, &[Statistic::Sum], "Count")
            .await
        {
            Ok(points) => points,
            Err(e) => {
                warn!(app = %self.base.app_name, elb = %self.elb_name, error = %e, "request-count fetch failed");
                return 0;
            }
        };

        let mut counts: Vec<f64> = datapoints.iter().filter_map(|d| d.sum).collect();
        if counts.is_empty() {
            counts.push(0.0);
        }
        let highest = counts.into_iter().fold(f64::MIN, f64::max);

        self.base.metrics.gauge(&format!("{}.request-count", self.base.app_name), highest);

        ceil_div(highest, self.threshold)
    }

    async fn surge_queue_max(&self, start: chrono::DateTime<Utc>, end: chrono::DateTime<Utc>) -> f64 {
        let mut dims = HashMap::new();
        dims.insert("LoadBalancerName".to_string(), self.surge_queue_name.clone());

        let datapoints = match self
            .cloud_metrics
            .get_metric_statistics("AWS/ELB", "SurgeQueueLength", &dims, start, end, 60, &[Statistic::Maximum], "Count")
            .await
        {
            Ok(points) => points,
            Err(e) => {
                warn!(app = %self.base.app_name, elb = %self.surge_queue_name, error = %e, "surge-queue fetch failed");
                return 0.0;
            }
        };

        let mut maxima: Vec<f64> = datapoints.iter().filter_map(|d| d.maximum).collect();
        if maxima.is_empty() {
            maxima.push(0.0);
        }
        maxima.into_iter().fold(f64::MIN, f64::max).max(0.0)
    }
}
