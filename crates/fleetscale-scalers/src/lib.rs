//! fleetscale-scalers — per-signal desired-instance-count estimators,
//! the `Scaler` variant type that unifies them, and the `App` that
//! bundles an ordered list of them behind one `max`-combining operation.

pub mod app;
pub mod base;
pub mod cpu;
pub mod elb;
pub mod schedule;
pub mod scheduled_jobs;
pub mod scaler;
pub mod sqs;

pub use app::{App, AppConfigError};
pub use base::ScalerBase;
pub use cpu::CpuScaler;
pub use elb::ElbScaler;
pub use schedule::{ScheduleConfigError, ScheduleScaler, TimeRange};
pub use scheduled_jobs::ScheduledJobsScaler;
pub use scaler::Scaler;
pub use sqs::SqsScaler;
