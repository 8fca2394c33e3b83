//! `CONFIG_PATH`-driven YAML loading, validation, and `App`/`Scaler`
//! construction against a set of live collaborators.

use fleetscale_scalers::{App, CpuScaler, ElbScaler, Scaler, ScalerBase, ScheduleScaler, ScheduledJobsScaler, SqsScaler, TimeRange};
use tracing::info;

use crate::collaborators::Collaborators;
use crate::error::{ConfigError, ConfigResult};
use crate::general::{GeneralConfig, ScalersConfig};
use crate::raw::{RawConfig, RawScalerSpec};

pub const DEFAULT_CONFIG_PATH: &str = "./../config.yml";

/// `CONFIG_PATH`, falling back to [`DEFAULT_CONFIG_PATH`].
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Read and parse the YAML config at `path`. Any I/O or parse failure is
/// fatal — callers propagate it out of `main` with `?`.
pub fn load_raw(path: &str) -> ConfigResult<RawConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;
    Ok(raw)
}

/// Validate `raw` and construct the running `GeneralConfig`,
/// `ScalersConfig`, and `App` list, wiring each scaler against
/// `collaborators`.
pub fn build(raw: RawConfig, collaborators: &Collaborators) -> ConfigResult<(GeneralConfig, ScalersConfig, Vec<App>)> {
    let scalers_config: ScalersConfig = raw.scalers.into();
    let general: GeneralConfig = raw.general.into();

    let mut apps = Vec::with_capacity(raw.apps.len());
    for raw_app in raw.apps {
        let mut scalers = Vec::with_capacity(raw_app.scalers.len());
        for spec in raw_app.scalers {
            let base = ScalerBase::new(
                raw_app.name.clone(),
                raw_app.min_instances,
                raw_app.max_instances,
                collaborators.clock.clone(),
                collaborators.metrics.clone(),
            );
            scalers.push(build_scaler(base, spec, &scalers_config, collaborators)?);
        }

        let app = App::new(raw_app.name.clone(), raw_app.min_instances, raw_app.max_instances, scalers)?;
        info!(app = %raw_app.name, min = raw_app.min_instances, max = raw_app.max_instances, "app configured");
        apps.push(app);
    }

    Ok((general, scalers_config, apps))
}

fn build_scaler(
    base: ScalerBase,
    spec: RawScalerSpec,
    scalers_config: &ScalersConfig,
    collaborators: &Collaborators,
) -> ConfigResult<Scaler> {
    let scaler = match spec {
        RawScalerSpec::ElbScaler { elb_name, surge_queue_name, threshold, window_secs } => {
            Scaler::Elb(ElbScaler::new(base, elb_name, surge_queue_name, threshold, window_secs, collaborators.cloud_metrics.clone()))
        }
        RawScalerSpec::SqsScaler { queues, queue_prefix, queue_length_threshold, throughput_threshold } => {
            let prefix = queue_prefix.unwrap_or_else(|| scalers_config.sqs_queue_prefix.clone());
            Scaler::Sqs(SqsScaler::new(base, queues, prefix, queue_length_threshold, throughput_threshold, collaborators.queue.clone()))
        }
        RawScalerSpec::CpuScaler { threshold_pct } => {
            let threshold = threshold_pct.unwrap_or(scalers_config.default_cpu_percentage_threshold);
            Scaler::Cpu(CpuScaler::new(base, threshold, collaborators.paas.clone()))
        }
        RawScalerSpec::ScheduledJobsScaler { threshold, lookahead, factor } => {
            Scaler::ScheduledJobs(ScheduledJobsScaler::new(base, threshold, lookahead, factor, collaborators.sql.clone()))
        }
        RawScalerSpec::ScheduleScaler { workdays, weekends, scale_factor } => {
            let workdays = workdays.iter().map(|s| TimeRange::parse(s)).collect::<Result<Vec<_>, _>>()?;
            let weekends = weekends.iter().map(|s| TimeRange::parse(s)).collect::<Result<Vec<_>, _>>()?;
            let factor = scale_factor.unwrap_or(scalers_config.default_schedule_scale_factor);
            Scaler::Schedule(ScheduleScaler::new(base, workdays, weekends, factor, scalers_config.schedule_scaler_enabled))
        }
    };
    Ok(scaler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetscale_clients::{CloudMetricsError, Datapoint, PaasError, QueueError, ScaleOutcome, SqlError};
    use fleetscale_core::{MockClock, ObservedApp};
    use fleetscale_metrics::RecordingSink;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct UnusedPaas;
    #[async_trait]
    impl fleetscale_clients::PaasClient for UnusedPaas {
        async fn list_apps(&self, _org: &str, _space: &str) -> Result<HashMap<String, ObservedApp>, PaasError> {
            Ok(HashMap::new())
        }
        async fn update_instances(&self, _guid: &str, _instances: u32) -> ScaleOutcome {
            ScaleOutcome::Ok
        }
        async fn get_app_stats(&self, _app_name: &str) -> Result<HashMap<String, f64>, PaasError> {
            Ok(HashMap::new())
        }
        fn reset_auth(&self) {}
    }

    struct UnusedCloudMetrics;
    #[async_trait]
    impl fleetscale_clients::CloudMetricsClient for UnusedCloudMetrics {
        async fn get_metric_statistics(
            &self,
            _namespace: &str,
            _name: &str,
            _dimensions: &HashMap<String, String>,
            _start: chrono::DateTime<chrono::Utc>,
            _end: chrono::DateTime<chrono::Utc>,
            _period_secs: u32,
            _statistics: &[fleetscale_clients::Statistic],
            _unit: &str,
        ) -> Result<Vec<Datapoint>, CloudMetricsError> {
            Ok(vec![])
        }
    }

    struct UnusedQueue;
    #[async_trait]
    impl fleetscale_clients::QueueClient for UnusedQueue {
        async fn get_queue_depth(&self, _url: &str) -> Result<u64, QueueError> {
            Ok(0)
        }
        async fn get_queue_throughput(&self, _url: &str) -> Result<u64, QueueError> {
            Ok(0)
        }
    }

    struct UnusedSql;
    #[async_trait]
    impl fleetscale_clients::SqlClient for UnusedSql {
        async fn scheduled_job_backlog(&self, _lookahead: &str) -> Result<i64, SqlError> {
            Ok(0)
        }
    }

    fn collaborators() -> Collaborators {
        Collaborators {
            paas: Arc::new(UnusedPaas),
            cloud_metrics: Arc::new(UnusedCloudMetrics),
            queue: Arc::new(UnusedQueue),
            sql: Arc::new(UnusedSql),
            clock: Arc::new(MockClock::new(0)),
            metrics: Arc::new(RecordingSink::new()),
        }
    }

    const SAMPLE_YAML: &str = r#"
GENERAL:
  SCHEDULE_INTERVAL_SECONDS: 60
  COOLDOWN_SECONDS_AFTER_SCALE_UP: 300
  COOLDOWN_SECONDS_AFTER_SCALE_DOWN: 60
  CF_API_URL: "https://api.example.com"
  CF_ORG: "notify"
  CF_SPACE: "production"
  STATSD_ENABLED: true
SCALERS:
  DEFAULT_CPU_PERCENTAGE_THRESHOLD: 60
  DEFAULT_SCHEDULE_SCALE_FACTOR: 0.8
  SQS_QUEUE_PREFIX: "https://sqs.eu-west-1.amazonaws.com/123456/"
  SCHEDULE_SCALER_ENABLED: true
APPS:
  - name: notify-api
    min_instances: 2
    max_instances: 10
    scalers:
      - type: ElbScaler
        elb_name: notify-api-elb
        threshold: 300
      - type: ScheduleScaler
        workdays: ["08:00-19:00"]
        scale_factor: 0.8
  - name: notify-delivery-worker
    min_instances: 1
    max_instances: 20
    scalers:
      - type: SqsScaler
        queues: ["notify-send-sms"]
        queue_length_threshold: 500
        throughput_threshold: 100
"#;

    #[test]
    fn parses_sample_config() {
        let raw: RawConfig = serde_yaml::from_str(SAMPLE_YAML).unwrap();
        assert_eq!(raw.apps.len(), 2);
        assert_eq!(raw.general.cf_org, "notify");
    }

    #[tokio::test]
    async fn builds_apps_from_sample_config() {
        let raw: RawConfig = serde_yaml::from_str(SAMPLE_YAML).unwrap();
        let (general, scalers_config, apps) = build(raw, &collaborators()).unwrap();
        assert_eq!(general.schedule_interval_seconds, 60);
        assert_eq!(scalers_config.sqs_queue_prefix, "https://sqs.eu-west-1.amazonaws.com/123456/");
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "notify-api");
        // ScheduleScaler at min=2 with no matching time (mock clock at epoch 0, disabled ranges by time) still valid.
        let _ = apps[0].get_desired_instance_count().await;
    }

    #[test]
    fn unknown_scaler_type_fails_to_parse() {
        let yaml = SAMPLE_YAML.replace("ElbScaler", "NotARealScaler");
        let result: Result<RawConfig, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_raw("/nonexistent/path/config.yml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "not: [valid: yaml").unwrap();
        let result = load_raw(path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[tokio::test]
    async fn app_with_no_scalers_fails_construction() {
        let yaml = r#"
GENERAL:
  SCHEDULE_INTERVAL_SECONDS: 60
  COOLDOWN_SECONDS_AFTER_SCALE_UP: 300
  COOLDOWN_SECONDS_AFTER_SCALE_DOWN: 60
  CF_API_URL: "https://api.example.com"
  CF_ORG: "notify"
  CF_SPACE: "production"
SCALERS:
  SQS_QUEUE_PREFIX: ""
APPS:
  - name: notify-api
    min_instances: 2
    max_instances: 10
    scalers: []
"#;
        let raw: RawConfig = serde_yaml::from_str(yaml).unwrap();
        let result = build(raw, &collaborators());
        assert!(matches!(result, Err(ConfigError::App(_))));
    }

    #[test]
    fn inverted_bounds_fail_construction() {
        let yaml = SAMPLE_YAML.replace("max_instances: 10", "max_instances: 1");
        let raw: RawConfig = serde_yaml::from_str(&yaml).unwrap();
        let result = build(raw, &collaborators());
        assert!(matches!(result, Err(ConfigError::App(_))));
    }
}
