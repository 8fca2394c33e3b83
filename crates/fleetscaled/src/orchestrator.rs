//! The per-tick orchestrator: fetch the PaaS inventory, bind it to each
//! configured app, and hand off to the decision engine.

use std::sync::Arc;
use std::time::Duration;

use fleetscale_clients::{PaasClient, PaasError};
use fleetscale_core::ObservedApp;
use fleetscale_engine::DecisionEngine;
use fleetscale_scalers::App;
use tracing::{info_span, warn, Instrument};

/// How long to back off after an auth failure against the PaaS, to
/// avoid repeatedly hammering the account lock.
const AUTH_BACKOFF: Duration = Duration::from_secs(5 * 60);

pub struct Orchestrator {
    pub apps: Vec<App>,
    pub paas: Arc<dyn PaasClient>,
    pub decision_engine: DecisionEngine,
    pub cf_org: String,
    pub cf_space: String,
}

impl Orchestrator {
    pub async fn run_tick(&mut self, sequence: u64) {
        async {
            let snapshot = self.fetch_snapshot().await;

            for app in &mut self.apps {
                let span = info_span!("app", name = %app.name);
                let _enter = span.enter();

                let Some(observed) = snapshot.get(&app.name).cloned() else {
                    warn!("app not present in PaaS snapshot this tick");
                    continue;
                };

                let current = observed.instances;
                let guid = observed.guid.clone();
                app.bind_observed(observed);

                let desired = app.get_desired_instance_count().await;
                self.decision_engine.apply(&app.name, &guid, current, desired).await;
            }
        }
        .instrument(info_span!("tick", sequence))
        .await
    }

    async fn fetch_snapshot(&self) -> std::collections::HashMap<String, ObservedApp> {
        match self.paas.list_apps(&self.cf_org, &self.cf_space).await {
            Ok(snapshot) => snapshot,
            Err(PaasError::Auth(reason)) => {
                warn!(reason, "PaaS auth failed, backing off and resetting client");
                tokio::time::sleep(AUTH_BACKOFF).await;
                self.paas.reset_auth();
                std::collections::HashMap::new()
            }
            Err(e) => {
                warn!(error = %e, "PaaS snapshot fetch failed");
                std::collections::HashMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fleetscale_clients::ScaleOutcome;
    use fleetscale_cooldown::InMemoryCooldownStore;
    use fleetscale_core::MockClock;
    use fleetscale_metrics::RecordingSink;
    use fleetscale_scalers::{ScalerBase, Scaler, ScheduleScaler};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakePaas {
        apps: HashMap<String, ObservedApp>,
        update_calls: Mutex<Vec<(String, u32)>>,
    }

    #[async_trait]
    impl PaasClient for FakePaas {
        async fn list_apps(&self, _org: &str, _space: &str) -> Result<HashMap<String, ObservedApp>, PaasError> {
            Ok(self.apps.clone())
        }
        async fn update_instances(&self, guid: &str, instances: u32) -> ScaleOutcome {
            self.update_calls.lock().unwrap().push((guid.to_string(), instances));
            ScaleOutcome::Ok
        }
        async fn get_app_stats(&self, _app_name: &str) -> Result<HashMap<String, f64>, PaasError> {
            Ok(HashMap::new())
        }
        fn reset_auth(&self) {}
    }

    fn schedule_scaler(min: u32, max: u32, clock: Arc<dyn fleetscale_core::Clock>) -> Scaler {
        let base = ScalerBase::new("notify-api", min, max, clock, Arc::new(RecordingSink::new()));
        Scaler::Schedule(ScheduleScaler::new(base, vec![], vec![], 0.8, false))
    }

    #[tokio::test]
    async fn app_missing_from_snapshot_is_skipped() {
        let clock: Arc<dyn fleetscale_core::Clock> = Arc::new(MockClock::new(1_000));
        let app = App::new("notify-api", 1, 10, vec![schedule_scaler(1, 10, clock.clone())]).unwrap();
        let paas = Arc::new(FakePaas { apps: HashMap::new(), update_calls: Mutex::new(Vec::new()) });
        let decision_engine = DecisionEngine::new(
            Arc::new(InMemoryCooldownStore::new()),
            paas.clone(),
            Arc::new(RecordingSink::new()),
            clock,
            300,
            60,
        );
        let mut orchestrator = Orchestrator {
            apps: vec![app],
            paas: paas.clone(),
            decision_engine,
            cf_org: "notify".to_string(),
            cf_space: "production".to_string(),
        };

        orchestrator.run_tick(1).await;

        assert!(paas.update_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn app_present_in_snapshot_is_scaled() {
        let clock: Arc<dyn fleetscale_core::Clock> = Arc::new(MockClock::new(1_000));
        let app = App::new("notify-api", 1, 10, vec![schedule_scaler(1, 10, clock.clone())]).unwrap();
        let mut apps_snapshot = HashMap::new();
        apps_snapshot.insert("notify-api".to_string(), ObservedApp { guid: "guid-1".to_string(), instances: 5 });
        let paas = Arc::new(FakePaas { apps: apps_snapshot, update_calls: Mutex::new(Vec::new()) });
        let decision_engine = DecisionEngine::new(
            Arc::new(InMemoryCooldownStore::new()),
            paas.clone(),
            Arc::new(RecordingSink::new()),
            clock,
            300,
            60,
        );
        let mut orchestrator = Orchestrator {
            apps: vec![app],
            paas: paas.clone(),
            decision_engine,
            cf_org: "notify".to_string(),
            cf_space: "production".to_string(),
        };

        orchestrator.run_tick(1).await;

        // Disabled schedule scaler returns min_instances=1 against current=5, a
        // scale-down — but with no prior cooldown record this is a cold start,
        // which seeds both cooldowns and suppresses the scale-down for one period.
        assert!(paas.update_calls.lock().unwrap().is_empty());
    }
}
