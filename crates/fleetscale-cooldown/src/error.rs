//! Error types for cooldown store implementations.

use thiserror::Error;

/// Result type alias for cooldown store operations.
pub type CooldownResult<T> = Result<T, CooldownError>;

/// Errors that can occur while reading or writing cooldown records.
#[derive(Debug, Error)]
pub enum CooldownError {
    #[error("failed to open cooldown store: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),
}
