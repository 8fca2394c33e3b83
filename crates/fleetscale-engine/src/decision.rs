//! The decision engine: scale-change policy, cooldowns, and the
//! single-step-down rule.

use std::sync::Arc;

use fleetscale_clients::{PaasClient, ScaleOutcome};
use fleetscale_cooldown::CooldownStore;
use fleetscale_core::{Clock, CooldownKind, MetricsSink};
use tracing::{error, info, warn};

/// Combines a per-app desired/current instance count with cooldown
/// state into at most one scale RPC per call, per invariant 2.
pub struct DecisionEngine {
    cooldown: Arc<dyn CooldownStore>,
    paas: Arc<dyn PaasClient>,
    metrics: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock>,
    cooldown_up_secs: u64,
    cooldown_down_secs: u64,
}

impl DecisionEngine {
    pub fn new(
        cooldown: Arc<dyn CooldownStore>,
        paas: Arc<dyn PaasClient>,
        metrics: Arc<dyn MetricsSink>,
        clock: Arc<dyn Clock>,
        cooldown_up_secs: u64,
        cooldown_down_secs: u64,
    ) -> Self {
        Self {
            cooldown,
            paas,
            metrics,
            clock,
            cooldown_up_secs,
            cooldown_down_secs,
        }
    }

    /// Apply the scale policy for one app on one tick. `guid` is the
    /// PaaS-assigned identifier used in the scale RPC.
    pub async fn apply(&self, app_name: &str, guid: &str, current: u32, desired: u32) {
        let now = self.clock.now_unix();

        if desired == current {
            self.publish(app_name, current);
            return;
        }

        let new = if desired > current {
            if let Err(e) = self.cooldown.set(app_name, CooldownKind::Up, now) {
                warn!(app = app_name, error = %e, "failed to record scale-up cooldown");
            }
            desired
        } else {
            match self.scale_down_suppressed_by(app_name, now) {
                // 3a: within the scale-up cooldown — publish the unchanged count.
                Some(CooldownKind::Up) => {
                    self.publish(app_name, current);
                    return;
                }
                // 3b: within the scale-down cooldown — skip silently, no publish.
                Some(CooldownKind::Down) => {
                    return;
                }
                None => {
                    if let Err(e) = self.cooldown.set(app_name, CooldownKind::Down, now) {
                        warn!(app = app_name, error = %e, "failed to record scale-down cooldown");
                    }
                    current - 1
                }
            }
        };

        if new != current {
            self.scale(app_name, guid, new).await;
        }
        self.publish(app_name, new);
    }

    /// Checks both cooldown kinds, applying the missing-record policy: a
    /// missing record is treated as "just happened now", which writes
    /// `now` and suppresses this scale-down for one cooldown period so a
    /// restart can't immediately thrash. Returns which cooldown (if any)
    /// suppresses the scale-down; the up-cooldown takes precedence when
    /// both apply, matching step 3a's publish-and-return over step 3b's
    /// silent skip.
    fn scale_down_suppressed_by(&self, app_name: &str, now: u64) -> Option<CooldownKind> {
        // Both kinds are checked (and missing records seeded) unconditionally
        // rather than short-circuiting, so a cold start seeds both
        // last_scale_up and last_scale_down as the missing-cooldown policy requires.
        let blocked_by_up = self.is_within_cooldown(app_name, CooldownKind::Up, now, self.cooldown_up_secs);
        let blocked_by_down = self.is_within_cooldown(app_name, CooldownKind::Down, now, self.cooldown_down_secs);

        if blocked_by_up {
            info!(app = app_name, "scale-down suppressed by scale-up cooldown");
            Some(CooldownKind::Up)
        } else if blocked_by_down {
            info!(app = app_name, "scale-down suppressed by scale-down cooldown");
            Some(CooldownKind::Down)
        } else {
            None
        }
    }

    fn is_within_cooldown(&self, app_name: &str, kind: CooldownKind, now: u64, cooldown_secs: u64) -> bool {
        let last = match self.cooldown.get(app_name, kind) {
            Ok(Some(record)) => record.timestamp,
            Ok(None) => {
                if let Err(e) = self.cooldown.set(app_name, kind, now) {
                    warn!(app = app_name, error = %e, "failed to seed missing cooldown record");
                }
                now
            }
            Err(e) => {
                warn!(app = app_name, error = %e, "cooldown read failed, treating as just happened");
                now
            }
        };
        now < last + cooldown_secs
    }

    async fn scale(&self, app_name: &str, guid: &str, new: u32) {
        match self.paas.update_instances(guid, new).await {
            ScaleOutcome::Ok => {
                info!(app = app_name, new_instances = new, "scaled app");
            }
            ScaleOutcome::DeploymentInFlight => {
                info!(app = app_name, "scale skipped, deployment in flight");
            }
            ScaleOutcome::Other(e) => {
                error!(app = app_name, error = %e, "scale RPC failed");
            }
        }
    }

    fn publish(&self, app_name: &str, instances: u32) {
        self.metrics.gauge(&format!("{app_name}.instance-count"), instances as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fleetscale_clients::PaasError;
    use fleetscale_cooldown::InMemoryCooldownStore;
    use fleetscale_core::{MockClock, ObservedApp};
    use fleetscale_metrics::RecordingSink;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakePaas {
        outcome: Mutex<ScaleOutcomeKind>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    #[derive(Clone, Copy)]
    enum ScaleOutcomeKind {
        Ok,
        DeploymentInFlight,
        Error,
    }

    #[async_trait]
    impl PaasClient for FakePaas {
        async fn list_apps(&self, _org: &str, _space: &str) -> Result<HashMap<String, ObservedApp>, PaasError> {
            Ok(HashMap::new())
        }

        async fn update_instances(&self, guid: &str, instances: u32) -> ScaleOutcome {
            self.calls.lock().unwrap().push((guid.to_string(), instances));
            match *self.outcome.lock().unwrap() {
                ScaleOutcomeKind::Ok => ScaleOutcome::Ok,
                ScaleOutcomeKind::DeploymentInFlight => ScaleOutcome::DeploymentInFlight,
                ScaleOutcomeKind::Error => ScaleOutcome::Other(PaasError::Timeout),
            }
        }

        async fn get_app_stats(&self, _app_name: &str) -> Result<HashMap<String, f64>, PaasError> {
            Ok(HashMap::new())
        }

        fn reset_auth(&self) {}
    }

    fn engine(clock: Arc<MockClock>, cooldown_up: u64, cooldown_down: u64) -> (DecisionEngine, Arc<FakePaas>, Arc<RecordingSink>, Arc<InMemoryCooldownStore>) {
        let paas = Arc::new(FakePaas { outcome: Mutex::new(ScaleOutcomeKind::Ok), calls: Mutex::new(Vec::new()) });
        let metrics = Arc::new(RecordingSink::new());
        let cooldown = Arc::new(InMemoryCooldownStore::new());
        let e = DecisionEngine::new(cooldown.clone(), paas.clone(), metrics.clone(), clock, cooldown_up, cooldown_down);
        (e, paas, metrics, cooldown)
    }

    #[tokio::test]
    async fn s1_equal_desired_and_current_publishes_and_does_not_scale() {
        let clock = Arc::new(MockClock::new(0));
        let (engine, paas, metrics, _) = engine(clock, 300, 60);
        engine.apply("notify-api", "guid-1", 6, 6).await;
        assert!(paas.calls.lock().unwrap().is_empty());
        assert_eq!(metrics.gauge_value("notify-api.instance-count"), Some(6.0));
    }

    #[tokio::test]
    async fn scale_up_calls_paas_and_records_cooldown() {
        let clock = Arc::new(MockClock::new(1_000));
        let (engine, paas, metrics, cooldown) = engine(clock, 300, 60);
        engine.apply("notify-api", "guid-1", 5, 8).await;
        assert_eq!(paas.calls.lock().unwrap().as_slice(), &[("guid-1".to_string(), 8)]);
        assert_eq!(metrics.gauge_value("notify-api.instance-count"), Some(8.0));
        assert_eq!(cooldown.get("notify-api", CooldownKind::Up).unwrap().unwrap().timestamp, 1_000);
    }

    #[tokio::test]
    async fn s3_single_step_down_after_cooldowns_elapsed() {
        let clock = Arc::new(MockClock::new(1_000));
        let (engine, paas, _, cooldown) = engine(clock.clone(), 300, 60);
        cooldown.set("notify-api", CooldownKind::Up, 1_000 - 325).unwrap();
        cooldown.set("notify-api", CooldownKind::Down, 1_000 - 600).unwrap();

        engine.apply("notify-api", "guid-1", 4, 1).await;

        assert_eq!(paas.calls.lock().unwrap().as_slice(), &[("guid-1".to_string(), 3)]);
        assert_eq!(cooldown.get("notify-api", CooldownKind::Down).unwrap().unwrap().timestamp, 1_000);
    }

    #[tokio::test]
    async fn s4_suppresses_scale_down_within_up_cooldown() {
        let clock = Arc::new(MockClock::new(1_000));
        let (engine, paas, metrics, _) = engine(clock.clone(), 300, 60);
        // last_scale_up was 100s ago, well within the 300s cooldown.
        let cooldown = fleetscale_cooldown::InMemoryCooldownStore::new();
        cooldown.set("notify-api", CooldownKind::Up, 1_000 - 100).unwrap();
        let engine = DecisionEngine::new(Arc::new(cooldown), Arc::new(FakePaas { outcome: Mutex::new(ScaleOutcomeKind::Ok), calls: Mutex::new(Vec::new()) }), metrics.clone(), clock, 300, 60);

        engine.apply("notify-api", "guid-1", 4, 3).await;

        assert_eq!(metrics.gauge_value("notify-api.instance-count"), Some(4.0));
        let _ = paas;
    }

    #[tokio::test]
    async fn suppresses_scale_down_within_down_cooldown_without_publishing() {
        let clock = Arc::new(MockClock::new(1_000));
        let (engine, paas, metrics, cooldown) = engine(clock, 300, 60);
        // last_scale_up was 400s ago (past the 300s cooldown), but
        // last_scale_down was only 30s ago (within the 60s cooldown).
        cooldown.set("notify-api", CooldownKind::Up, 1_000 - 400).unwrap();
        cooldown.set("notify-api", CooldownKind::Down, 1_000 - 30).unwrap();

        engine.apply("notify-api", "guid-1", 4, 3).await;

        assert!(paas.calls.lock().unwrap().is_empty());
        // Step 3b is a silent skip: no RPC and no gauge publish.
        assert_eq!(metrics.gauge_value("notify-api.instance-count"), None);
    }

    #[tokio::test]
    async fn s5_deployment_in_flight_advances_cooldown_without_error() {
        let clock = Arc::new(MockClock::new(1_000));
        let paas = Arc::new(FakePaas { outcome: Mutex::new(ScaleOutcomeKind::DeploymentInFlight), calls: Mutex::new(Vec::new()) });
        let metrics = Arc::new(RecordingSink::new());
        let cooldown = Arc::new(InMemoryCooldownStore::new());
        let engine = DecisionEngine::new(cooldown.clone(), paas.clone(), metrics, Arc::new(MockClock::new(1_000)), 300, 60);

        engine.apply("notify-api", "guid-1", 5, 8).await;

        assert_eq!(paas.calls.lock().unwrap().len(), 1);
        assert_eq!(cooldown.get("notify-api", CooldownKind::Up).unwrap().unwrap().timestamp, 1_000);
    }

    #[tokio::test]
    async fn s6_cold_start_missing_cooldown_suppresses_and_seeds_both_records() {
        let clock = Arc::new(MockClock::new(1_000));
        let (engine, paas, metrics, cooldown) = engine(clock, 300, 60);

        engine.apply("notify-api", "guid-1", 4, 3).await;

        assert!(paas.calls.lock().unwrap().is_empty());
        assert_eq!(metrics.gauge_value("notify-api.instance-count"), Some(4.0));
        assert_eq!(cooldown.get("notify-api", CooldownKind::Up).unwrap().unwrap().timestamp, 1_000);
    }
}
