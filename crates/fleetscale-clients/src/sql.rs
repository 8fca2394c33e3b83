//! Relational-store collaborator — scheduled-job backlog query.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::SqlError;

/// The narrow SQL contract `ScheduledJobsScaler` consumes.
#[async_trait]
pub trait SqlClient: Send + Sync {
    /// Sum of `notification_count` for jobs scheduled within `lookahead`
    /// of now that are still in `scheduled` status. Never negative.
    async fn scheduled_job_backlog(&self, lookahead: &str) -> Result<i64, SqlError>;
}

/// `sqlx`-backed implementation against a Postgres `jobs` table.
pub struct PgSqlClient {
    pool: PgPool,
}

impl PgSqlClient {
    /// Connect a pool from a Postgres connection string (as sourced from
    /// `SQLALCHEMY_DATABASE_URI` or `VCAP_SERVICES`).
    pub async fn connect(database_url: &str) -> Result<Self, SqlError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| SqlError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SqlClient for PgSqlClient {
    async fn scheduled_job_backlog(&self, lookahead: &str) -> Result<i64, SqlError> {
        // `lookahead` is a fixed, config-derived interval literal (e.g.
        // "1 minute"), never user input, so it is safe to interpolate
        // into the query text — sqlx cannot bind parameters inside an
        // `interval '...'` literal.
        let query = format!(
            "SELECT COALESCE(SUM(notification_count), 0) FROM jobs \
             WHERE scheduled_for - current_timestamp < interval '{lookahead}' \
             AND job_status = 'scheduled'"
        );

        let backlog: i64 = sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SqlError::Query(e.to_string()))?;

        Ok(backlog)
    }
}
