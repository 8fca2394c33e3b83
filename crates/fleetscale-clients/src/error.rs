//! Error types for the external collaborators.

use thiserror::Error;

/// Errors from the PaaS collaborator.
#[derive(Debug, Error)]
pub enum PaasError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Response(String),
}

/// Result of a scale RPC against the PaaS.
///
/// Modeled as its own type rather than a plain `Result<(), PaasError>`
/// because a deployment-in-flight conflict is a distinct, expected
/// outcome that the decision engine logs at `info` rather than `error`.
#[derive(Debug)]
pub enum ScaleOutcome {
    Ok,
    /// The PaaS rejected the scale because a deployment is in progress
    /// (e.g. HTTP 422 with error code `CF-ScaleDisabledDuringDeployment`).
    DeploymentInFlight,
    Other(PaasError),
}

/// Errors from the cloud-metrics collaborator.
#[derive(Debug, Error)]
pub enum CloudMetricsError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Response(String),
}

/// Errors from the message-queue collaborator.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Response(String),
}

/// Errors from the relational-store collaborator.
#[derive(Debug, Error)]
pub enum SqlError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),
}
