//! `SqsScaler` — desired instance count from message-queue backlog and
//! arrival rate, modeled as two additive components.

use std::sync::Arc;

use fleetscale_clients::QueueClient;
use tracing::warn;

use crate::base::{ceil_div, ScalerBase};

/// Queue-backed scaler: backlog (`queueDepth`) and arrival rate
/// (`queueSendThroughput`) each contribute an independent additive term.
pub struct SqsScaler {
    pub base: ScalerBase,
    pub queues: Vec<String>,
    pub queue_prefix: String,
    pub queue_length_threshold: f64,
    pub throughput_threshold: f64,
    queue_client: Arc<dyn QueueClient>,
}

impl SqsScaler {
    pub fn new(
        base: ScalerBase,
        queues: Vec<String>,
        queue_prefix: impl Into<String>,
        queue_length_threshold: f64,
        throughput_threshold: f64,
        queue_client: Arc<dyn QueueClient>,
    ) -> Self {
        Self {
            base,
            queues,
            queue_prefix: queue_prefix.into(),
            queue_length_threshold,
            throughput_threshold,
            queue_client,
        }
    }

    pub async fn get_desired_instance_count(&self) -> u32 {
        let mut total_depth: u64 = 0;
        let mut highest_throughput: u64 = 0;

        for queue in &self.queues {
            let url = format!("{}{}", self.queue_prefix, queue);

            match self.queue_client.get_queue_depth(&url).await {
                Ok(depth) => {
                    total_depth += depth;
                    self.base.metrics.gauge(&format!("{queue}.queue-length"), depth as f64);
                }
                Err(e) => {
                    warn!(app = %self.base.app_name, queue = %queue, error = %e, "queue-depth fetch failed");
                }
            }

            match self.queue_client.get_queue_throughput(&url).await {
                Ok(throughput) => {
                    highest_throughput = highest_throughput.max(throughput);
                    self.base.metrics.gauge(&format!("{queue}.queue-throughput"), throughput as f64);
                    self.base
                        .metrics
                        .gauge(&format!("{queue}.throughput-tasks-pulled-from-queue"), throughput as f64);
                }
                Err(e) => {
                    warn!(app = %self.base.app_name, queue = %queue, error = %e, "queue-throughput fetch failed");
                }
            }
        }

        let backlog_term = ceil_div(total_depth as f64, self.queue_length_threshold);
        let throughput_term = ceil_div(highest_throughput as f64, self.throughput_threshold);

        self.base.clamp(backlog_term + throughput_term)
    }
}
