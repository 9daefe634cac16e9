use crate::parse::{parse_attendance, parse_setting, parse_targets, parse_task_scan};
use async_trait::async_trait;
use geogate_core::config::LayeredConfig;
use geogate_core::error::{GeogateError, Result};
use geogate_core::models::{
    AttendanceState, Coordinate, RadiusKind, Target, TaskCompletion, TaskScanState,
};
use geogate_core::ports::{AttendanceBackend, RadiusSource, TargetDirectory, TaskBackend};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Facility API client implementing every backend port
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HttpBackend {
    /// Base URL for the API (e.g., "http://localhost:8000/api")
    base_url: String,

    /// Bearer token sent with every request
    token: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            GeogateError::ConfigInvalid {
                key: "api_url".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Create a client from layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(
            config.api_url.value.clone(),
            config.api_token.value.clone(),
            Duration::from_secs(config.request_timeout_secs.value),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a JSON body; `None` on 404
    async fn get_json(&self, operation: &str, path: &str) -> Result<Option<Value>> {
        let url = self.url(path);
        debug!(%url, operation, "GET");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| unreachable_backend(operation, &self.base_url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(operation, response).await?;

        let body = response.json::<Value>().await.map_err(|e| {
            GeogateError::backend(operation, format!("Failed to parse response: {}", e))
        })?;
        Ok(Some(body))
    }

    /// POST a JSON body, discarding the response body
    async fn post_json<B: Serialize + Sync>(&self, operation: &str, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!(%url, operation, "POST");

        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| unreachable_backend(operation, &self.base_url, e))?;

        ensure_success(operation, response).await?;
        Ok(())
    }

    async fn post_attendance(&self, operation: &str, path: &str, target_id: &str, at: Coordinate) -> Result<()> {
        let request = AttendanceRequest {
            asset_id: target_id,
            latitude: at.latitude,
            longitude: at.longitude,
        };
        self.post_json(operation, path, &request).await
    }
}

async fn ensure_success(operation: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(GeogateError::backend(operation, format!("API error ({}): {}", status, error_text)))
}

fn unreachable_backend(operation: &str, base_url: &str, e: reqwest::Error) -> GeogateError {
    GeogateError::backend(operation, format!("Failed to reach API at {}: {}", base_url, e))
}

/// Request body for check-in and check-out
#[derive(Debug, Serialize)]
struct AttendanceRequest<'a> {
    asset_id: &'a str,
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl TargetDirectory for HttpBackend {
    async fn targets(&self) -> Result<Vec<Target>> {
        match self.get_json("assets", "assets").await? {
            Some(body) => parse_targets(&body),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl RadiusSource for HttpBackend {
    async fn raw_radius(&self, kind: RadiusKind) -> Result<Option<String>> {
        let path = format!("settings/{}", kind.settings_key());
        Ok(self.get_json("settings", &path).await?.as_ref().and_then(parse_setting))
    }
}

#[async_trait]
impl AttendanceBackend for HttpBackend {
    async fn today(&self) -> Result<AttendanceState> {
        match self.get_json("attendance", "attendance/today").await? {
            Some(body) => parse_attendance(&body),
            None => Ok(AttendanceState::not_checked_in()),
        }
    }

    async fn check_in(&self, target_id: &str, at: Coordinate) -> Result<()> {
        self.post_attendance("check-in", "attendance/check-in", target_id, at).await
    }

    async fn check_out(&self, target_id: &str, at: Coordinate) -> Result<()> {
        self.post_attendance("check-out", "attendance/check-out", target_id, at).await
    }
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn scan_state(&self, task_id: &str) -> Result<TaskScanState> {
        let path = format!("tasks/{}", task_id);
        match self.get_json("task", &path).await? {
            Some(body) => parse_task_scan(&body),
            None => Err(GeogateError::backend("task", format!("task {} not found", task_id))),
        }
    }

    async fn complete_task(&self, completion: &TaskCompletion) -> Result<()> {
        let path = format!("tasks/{}/complete", completion.task_id);
        self.post_json("complete-task", &path, completion).await
    }
}
