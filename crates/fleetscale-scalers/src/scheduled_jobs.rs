//! `ScheduledJobsScaler` — desired instance count from the SQL-backed
//! scheduled-job backlog, with a local circuit breaker over DB failures.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fleetscale_clients::SqlClient;
use fleetscale_core::Clock;
use tracing::warn;

use crate::base::{ceil_div, ScalerBase};

const CIRCUIT_BREAKER_SECS: u64 = 60;

/// Scheduled-job-backlog scaler. On a DB connection failure the breaker
/// opens for [`CIRCUIT_BREAKER_SECS`]; while open, calls return `0`
/// without touching the database, mirroring this stack's exponential
/// backoff tracker but with a fixed window rather than a growing one.
pub struct ScheduledJobsScaler {
    pub base: ScalerBase,
    pub threshold: f64,
    pub lookahead: String,
    pub factor: f64,
    sql: Arc<dyn SqlClient>,
    last_db_error: AtomicU64,
}

impl ScheduledJobsScaler {
    pub fn new(base: ScalerBase, threshold: f64, lookahead: impl Into<String>, factor: f64, sql: Arc<dyn SqlClient>) -> Self {
        Self {
            base,
            threshold,
            lookahead: lookahead.into(),
            factor,
            sql,
            last_db_error: AtomicU64::new(0),
        }
    }

    fn breaker_is_open(&self) -> bool {
        let last_error = self.last_db_error.load(Ordering::SeqCst);
        last_error != 0 && self.base.clock.now_unix() < last_error + CIRCUIT_BREAKER_SECS
    }

    pub async fn get_desired_instance_count(&self) -> u32 {
        if self.breaker_is_open() {
            return self.base.clamp(0);
        }

        let backlog = match self.sql.scheduled_job_backlog(&self.lookahead).await {
            Ok(backlog) => backlog,
            Err(e) => {
                warn!(app = %self.base.app_name, error = %e, "scheduled-job backlog query failed, opening circuit breaker");
                self.last_db_error.store(self.base.clock.now_unix(), Ordering::SeqCst);
                return self.base.clamp(0);
            }
        };

        self.base.metrics.gauge(&format!("{}.scheduled-job-backlog", self.base.app_name), backlog as f64);

        self.base.clamp(ceil_div(backlog as f64 * self.factor, self.threshold))
    }
}
