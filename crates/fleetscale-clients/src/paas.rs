//! PaaS collaborator — app inventory, instance scaling, and per-instance
//! CPU stats against a Cloud Foundry-style HTTP API.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fleetscale_core::ObservedApp;
use tracing::{debug, warn};

use crate::error::{PaasError, ScaleOutcome};

/// The narrow PaaS contract the decision engine and scalers consume.
///
/// Auth is cached internally; callers that hit [`PaasError::Auth`]
/// should back off and call [`PaasClient::reset_auth`] so the next
/// attempt re-authenticates, per the orchestrator's auth-failure policy.
#[async_trait]
pub trait PaasClient: Send + Sync {
    /// List apps in `org`/`space`, keyed by app name.
    async fn list_apps(&self, org: &str, space: &str) -> Result<HashMap<String, ObservedApp>, PaasError>;

    /// Request a new instance count for `guid`.
    async fn update_instances(&self, guid: &str, instances: u32) -> ScaleOutcome;

    /// Per-instance CPU fraction (0.0–1.0), keyed by instance index.
    async fn get_app_stats(&self, app_name: &str) -> Result<HashMap<String, f64>, PaasError>;

    /// Drop the cached bearer token so the next call re-authenticates.
    fn reset_auth(&self);
}

/// HTTP implementation of [`PaasClient`] against a Cloud Foundry-style API.
pub struct HttpPaasClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
    password: String,
    token: Mutex<Option<String>>,
}

impl HttpPaasClient {
    pub fn new(api_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("reqwest client builds"),
            api_url: api_url.into(),
            username: username.into(),
            password: password.into(),
            token: Mutex::new(None),
        }
    }

    async fn token(&self) -> Result<String, PaasError> {
        if let Some(token) = self.token.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Ok(token);
        }

        let resp = self
            .http
            .post(format!("{}/oauth/token", self.api_url))
            .basic_auth(&self.username, Some(&self.password))
            .form(&[("grant_type", "password")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaasError::Timeout
                } else {
                    PaasError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(PaasError::Auth(format!("status {}", resp.status())));
        }

        #[derive(serde::Deserialize)]
        struct TokenResponse {
            access_token: String,
        }
        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| PaasError::Response(e.to_string()))?;

        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(body.access_token.clone());
        Ok(body.access_token)
    }
}

#[async_trait]
impl PaasClient for HttpPaasClient {
    async fn list_apps(&self, org: &str, space: &str) -> Result<HashMap<String, ObservedApp>, PaasError> {
        let token = self.token().await?;

        #[derive(serde::Deserialize)]
        struct AppEntry {
            name: String,
            guid: String,
            instances: u32,
        }

        let resp = self
            .http
            .get(format!("{}/v2/apps", self.api_url))
            .bearer_auth(&token)
            .query(&[("organization", org), ("space", space)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaasError::Timeout
                } else {
                    PaasError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(PaasError::Response(format!("status {}", resp.status())));
        }

        let apps: Vec<AppEntry> = resp.json().await.map_err(|e| PaasError::Response(e.to_string()))?;
        debug!(org, space, count = apps.len(), "listed PaaS apps");

        Ok(apps
            .into_iter()
            .map(|a| {
                (
                    a.name,
                    ObservedApp {
                        guid: a.guid,
                        instances: a.instances,
                    },
                )
            })
            .collect())
    }

    async fn update_instances(&self, guid: &str, instances: u32) -> ScaleOutcome {
        let token = match self.token().await {
            Ok(t) => t,
            Err(e) => return ScaleOutcome::Other(e),
        };

        let resp = self
            .http
            .put(format!("{}/v2/apps/{}", self.api_url, guid))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "instances": instances }))
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return ScaleOutcome::Other(PaasError::Timeout),
            Err(e) => return ScaleOutcome::Other(PaasError::Transport(e.to_string())),
        };

        if resp.status().as_u16() == 422 {
            let body = resp.text().await.unwrap_or_default();
            if body.contains("CF-ScaleDisabledDuringDeployment") {
                return ScaleOutcome::DeploymentInFlight;
            }
            return ScaleOutcome::Other(PaasError::Response(body));
        }

        if !resp.status().is_success() {
            return ScaleOutcome::Other(PaasError::Response(format!("status {}", resp.status())));
        }

        ScaleOutcome::Ok
    }

    async fn get_app_stats(&self, app_name: &str) -> Result<HashMap<String, f64>, PaasError> {
        let token = self.token().await?;

        #[derive(serde::Deserialize)]
        struct InstanceStats {
            usage: UsageStats,
        }
        #[derive(serde::Deserialize)]
        struct UsageStats {
            cpu: f64,
        }

        let resp = self
            .http
            .get(format!("{}/v2/apps/{}/stats", self.api_url, app_name))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaasError::Timeout
                } else {
                    PaasError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(PaasError::Response(format!("status {}", resp.status())));
        }

        let stats: HashMap<String, InstanceStats> =
            resp.json().await.map_err(|e| PaasError::Response(e.to_string()))?;

        Ok(stats.into_iter().map(|(idx, s)| (idx, s.usage.cpu)).collect())
    }

    fn reset_auth(&self) {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        warn!("PaaS client auth reset");
    }
}
