//! YAML-shaped config structs, deserialized as-written before validation.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "GENERAL")]
    pub general: RawGeneral,
    #[serde(rename = "SCALERS")]
    pub scalers: RawScalers,
    #[serde(rename = "APPS")]
    pub apps: Vec<RawApp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawGeneral {
    pub schedule_interval_seconds: u64,
    pub cooldown_seconds_after_scale_up: u64,
    pub cooldown_seconds_after_scale_down: u64,
    pub cf_api_url: String,
    pub cf_org: String,
    pub cf_space: String,
    #[serde(default)]
    pub statsd_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawScalers {
    #[serde(default = "default_cpu_threshold")]
    pub default_cpu_percentage_threshold: f64,
    #[serde(default = "default_schedule_scale_factor")]
    pub default_schedule_scale_factor: f64,
    #[serde(default)]
    pub sqs_queue_prefix: String,
    #[serde(default = "default_true")]
    pub schedule_scaler_enabled: bool,
}

fn default_cpu_threshold() -> f64 {
    60.0
}

fn default_schedule_scale_factor() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RawApp {
    pub name: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub scalers: Vec<RawScalerSpec>,
}

/// Tagged by `type`, whose values match this stack's scaler class names
/// one-for-one so config authors carry over the names they already know.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum RawScalerSpec {
    ElbScaler {
        elb_name: String,
        #[serde(default)]
        surge_queue_name: Option<String>,
        threshold: f64,
        #[serde(default = "default_window_secs")]
        window_secs: i64,
    },
    SqsScaler {
        queues: Vec<String>,
        #[serde(default)]
        queue_prefix: Option<String>,
        queue_length_threshold: f64,
        throughput_threshold: f64,
    },
    CpuScaler {
        #[serde(default)]
        threshold_pct: Option<f64>,
    },
    ScheduledJobsScaler {
        threshold: f64,
        #[serde(default = "default_lookahead")]
        lookahead: String,
        #[serde(default = "default_scheduled_jobs_factor")]
        factor: f64,
    },
    ScheduleScaler {
        #[serde(default)]
        workdays: Vec<String>,
        #[serde(default)]
        weekends: Vec<String>,
        #[serde(default)]
        scale_factor: Option<f64>,
    },
}

fn default_window_secs() -> i64 {
    300
}

fn default_lookahead() -> String {
    "1 minute".to_string()
}

fn default_scheduled_jobs_factor() -> f64 {
    0.3
}
