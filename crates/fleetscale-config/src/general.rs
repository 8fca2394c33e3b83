//! Validated, typed view of the `GENERAL`/`SCALERS` config sections.

use crate::raw::{RawGeneral, RawScalers};

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub schedule_interval_seconds: u64,
    pub cooldown_seconds_after_scale_up: u64,
    pub cooldown_seconds_after_scale_down: u64,
    pub cf_api_url: String,
    pub cf_org: String,
    pub cf_space: String,
    pub statsd_enabled: bool,
}

impl From<RawGeneral> for GeneralConfig {
    fn from(raw: RawGeneral) -> Self {
        Self {
            schedule_interval_seconds: raw.schedule_interval_seconds,
            cooldown_seconds_after_scale_up: raw.cooldown_seconds_after_scale_up,
            cooldown_seconds_after_scale_down: raw.cooldown_seconds_after_scale_down,
            cf_api_url: raw.cf_api_url,
            cf_org: raw.cf_org,
            cf_space: raw.cf_space,
            statsd_enabled: raw.statsd_enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScalersConfig {
    pub default_cpu_percentage_threshold: f64,
    pub default_schedule_scale_factor: f64,
    pub sqs_queue_prefix: String,
    pub schedule_scaler_enabled: bool,
}

impl From<RawScalers> for ScalersConfig {
    fn from(raw: RawScalers) -> Self {
        Self {
            default_cpu_percentage_threshold: raw.default_cpu_percentage_threshold,
            default_schedule_scale_factor: raw.default_schedule_scale_factor,
            sqs_queue_prefix: raw.sqs_queue_prefix,
            schedule_scaler_enabled: raw.schedule_scaler_enabled,
        }
    }
}
