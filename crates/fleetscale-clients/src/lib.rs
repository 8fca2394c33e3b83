//! fleetscale-clients — external collaborators abstracted behind narrow
//! traits: PaaS, cloud-metrics, message-queue, and relational-store.
//!
//! The decision engine and scalers depend only on the traits in this
//! crate, never on `reqwest`/`sqlx` directly, so tests substitute
//! in-memory fakes without touching the network or a database.

pub mod cloud_metrics;
pub mod error;
pub mod paas;
pub mod queue;
pub mod sql;

pub use cloud_metrics::{CloudMetricsClient, Datapoint, HttpCloudMetricsClient, Statistic};
pub use error::{CloudMetricsError, PaasError, QueueError, ScaleOutcome, SqlError};
pub use paas::{HttpPaasClient, PaasClient};
pub use queue::{HttpQueueClient, QueueClient};
pub use sql::{PgSqlClient, SqlClient};
