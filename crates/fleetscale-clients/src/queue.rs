//! Message-queue collaborator — queue depth over an SQS-compatible HTTP API.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::QueueError;

/// The narrow message-queue contract `SqsScaler` consumes.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Approximate number of messages currently visible in the queue at `url`.
    async fn get_queue_depth(&self, url: &str) -> Result<u64, QueueError>;

    /// Messages sent to the queue at `url` over the collaborator's
    /// implementation-defined sampling window (arrival-rate signal).
    async fn get_queue_throughput(&self, url: &str) -> Result<u64, QueueError>;
}

/// HTTP implementation against an SQS-compatible endpoint.
pub struct HttpQueueClient {
    http: reqwest::Client,
}

impl HttpQueueClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("reqwest client builds"),
        }
    }
}

#[async_trait]
impl QueueClient for HttpQueueClient {
    async fn get_queue_depth(&self, url: &str) -> Result<u64, QueueError> {
        let resp = self
            .http
            .get(url)
            .query(&[("Action", "GetQueueAttributes"), ("AttributeName.1", "ApproximateNumberOfMessages")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueueError::Timeout
                } else {
                    QueueError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(QueueError::Response(format!("status {}", resp.status())));
        }

        #[derive(serde::Deserialize)]
        struct Attributes {
            #[serde(rename = "ApproximateNumberOfMessages")]
            approximate_number_of_messages: u64,
        }

        let attrs: Attributes = resp.json().await.map_err(|e| QueueError::Response(e.to_string()))?;
        Ok(attrs.approximate_number_of_messages)
    }

    async fn get_queue_throughput(&self, url: &str) -> Result<u64, QueueError> {
        let resp = self
            .http
            .get(url)
            .query(&[("Action", "GetQueueAttributes"), ("AttributeName.1", "ApproximateNumberOfMessagesSent")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueueError::Timeout
                } else {
                    QueueError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(QueueError::Response(format!("status {}", resp.status())));
        }

        #[derive(serde::Deserialize)]
        struct Attributes {
            #[serde(rename = "ApproximateNumberOfMessagesSent")]
            approximate_number_of_messages_sent: u64,
        }

        let attrs: Attributes = resp.json().await.map_err(|e| QueueError::Response(e.to_string()))?;
        Ok(attrs.approximate_number_of_messages_sent)
    }
}
