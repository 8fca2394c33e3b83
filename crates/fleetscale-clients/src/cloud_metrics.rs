//! Cloud-metrics collaborator — CloudWatch-compatible `GetMetricStatistics`
//! over HTTP. Request signing is abstracted behind the trait so tests can
//! substitute an in-memory fake instead of signing real AWS requests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CloudMetricsError;

/// Aggregation requested for a metric-statistics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Sum,
    Maximum,
}

/// One datapoint returned by `get_metric_statistics`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub sum: Option<f64>,
    pub maximum: Option<f64>,
}

/// The narrow cloud-metrics contract scalers consume.
#[async_trait]
pub trait CloudMetricsClient: Send + Sync {
    /// Fetch datapoints for `name` in `namespace` over `[start, end]`,
    /// bucketed into `period`-second windows.
    #[allow(clippy::too_many_arguments)]
    async fn get_metric_statistics(
        &self,
        namespace: &str,
        name: &str,
        dimensions: &HashMap<String, String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_secs: u32,
        statistics: &[Statistic],
        unit: &str,
    ) -> Result<Vec<Datapoint>, CloudMetricsError>;
}

/// HTTP implementation against a CloudWatch-compatible endpoint.
pub struct HttpCloudMetricsClient {
    http: reqwest::Client,
    endpoint: String,
    region: String,
}

impl HttpCloudMetricsClient {
    pub fn new(endpoint: impl Into<String>, region: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("reqwest client builds"),
            endpoint: endpoint.into(),
            region: region.into(),
        }
    }
}

#[async_trait]
impl CloudMetricsClient for HttpCloudMetricsClient {
    async fn get_metric_statistics(
        &self,
        namespace: &str,
        name: &str,
        dimensions: &HashMap<String, String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_secs: u32,
        statistics: &[Statistic],
        unit: &str,
    ) -> Result<Vec<Datapoint>, CloudMetricsError> {
        #[derive(serde::Serialize)]
        struct Query<'a> {
            namespace: &'a str,
            metric_name: &'a str,
            dimensions: &'a HashMap<String, String>,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
            period: u32,
            statistics: Vec<&'static str>,
            unit: &'a str,
            region: &'a str,
        }

        let query = Query {
            namespace,
            metric_name: name,
            dimensions,
            start_time: start,
            end_time: end,
            period: period_secs,
            statistics: statistics
                .iter()
                .map(|s| match s {
                    Statistic::Sum => "Sum",
                    Statistic::Maximum => "Maximum",
                })
                .collect(),
            unit,
            region: &self.region,
        };

        let resp = self
            .http
            .post(format!("{}/metric-statistics", self.endpoint))
            .json(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CloudMetricsError::Timeout
                } else {
                    CloudMetricsError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(CloudMetricsError::Response(format!("status {}", resp.status())));
        }

        #[derive(serde::Deserialize)]
        struct RawDatapoint {
            timestamp: DateTime<Utc>,
            #[serde(rename = "Sum")]
            sum: Option<f64>,
            #[serde(rename = "Maximum")]
            maximum: Option<f64>,
        }
        #[derive(serde::Deserialize)]
        struct RawResponse {
            datapoints: Vec<RawDatapoint>,
        }

        let body: RawResponse = resp.json().await.map_err(|e| CloudMetricsError::Response(e.to_string()))?;

        Ok(body
            .datapoints
            .into_iter()
            .map(|d| Datapoint {
                timestamp: d.timestamp,
                sum: d.sum,
                maximum: d.maximum,
            })
            .collect())
    }
}
