//! fleetscale-config — YAML config loading, validation, and
//! collaborator-bound construction of the running `App`/`Scaler` tree.

pub mod collaborators;
pub mod error;
pub mod general;
pub mod loader;
pub mod raw;

pub use collaborators::Collaborators;
pub use error::{ConfigError, ConfigResult};
pub use general::{GeneralConfig, ScalersConfig};
pub use loader::{build, config_path, load_raw, DEFAULT_CONFIG_PATH};
pub use raw::RawConfig;
