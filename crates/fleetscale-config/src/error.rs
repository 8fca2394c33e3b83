//! Config-loading errors. Every variant is fatal at startup.

use thiserror::Error;

use fleetscale_scalers::{AppConfigError, ScheduleConfigError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid schedule in app config: {0}")]
    Schedule(#[from] ScheduleConfigError),

    #[error("invalid app config: {0}")]
    App(#[from] AppConfigError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
