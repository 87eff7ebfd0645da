//! HTTP-backed data source.
//!
//! Every failure is reported as a [`SourceError`]; there is no fallback to
//! mock data.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::{SourceError, SourceResult};
use super::paths::{Endpoint, PathScheme, MODEL_ID_PLACEHOLDER};
use crate::config::ApiSettings;
use crate::models::{
    BenchmarkSnapshot, BenchmarkTrend, Completion, CompletionRequest, HealthStatus, LoadAck,
    MetricsSnapshot, ModelInfo, PerformanceReport, SaveAck, SettingsState,
};

/// Client for a dashboard backend.
#[derive(Debug, Clone)]
pub struct LiveSource {
    client: reqwest::Client,
    base_url: String,
    scheme: PathScheme,
}

impl LiveSource {
    /// Build a client from the API settings.
    pub fn new(api: &ApiSettings) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim().trim_end_matches('/').to_string(),
            scheme: api.path_scheme,
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scheme(&self) -> PathScheme {
        self.scheme
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> SourceResult<T> {
        let path = endpoint.path(self.scheme);
        debug!(operation = endpoint.name(), path, "GET");

        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(path, e))?;

        decode(path, response).await
    }

    async fn post<B, T>(&self, endpoint: Endpoint, path: &str, body: &B) -> SourceResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(operation = endpoint.name(), path, "POST");

        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(path, e))?;

        decode(path, response).await
    }

    pub async fn health(&self) -> SourceResult<HealthStatus> {
        self.get(Endpoint::Health).await
    }

    pub async fn metrics(&self) -> SourceResult<MetricsSnapshot> {
        self.get(Endpoint::Metrics).await
    }

    pub async fn settings(&self) -> SourceResult<SettingsState> {
        self.get(Endpoint::GetSettings).await
    }

    pub async fn update_settings(&self, settings: &SettingsState) -> SourceResult<SaveAck> {
        let path = Endpoint::UpdateSettings.path(self.scheme);
        self.post(Endpoint::UpdateSettings, path, settings).await
    }

    pub async fn model_info(&self) -> SourceResult<ModelInfo> {
        self.get(Endpoint::ModelInfo).await
    }

    pub async fn load_model(&self, model_id: &str) -> SourceResult<LoadAck> {
        validate_model_id(model_id)?;
        let path = Endpoint::LoadModel
            .path(self.scheme)
            .replace(MODEL_ID_PLACEHOLDER, model_id);
        self.post(Endpoint::LoadModel, &path, &serde_json::json!({})).await
    }

    pub async fn benchmarks(&self) -> SourceResult<BenchmarkSnapshot> {
        self.get(Endpoint::Benchmarks).await
    }

    pub async fn performance_stats(&self) -> SourceResult<PerformanceReport> {
        self.get(Endpoint::PerformanceStats).await
    }

    pub async fn benchmark_trend(&self) -> SourceResult<BenchmarkTrend> {
        self.get(Endpoint::BenchmarkTrend).await
    }

    pub async fn generate_completion(&self, request: &CompletionRequest) -> SourceResult<Completion> {
        let path = Endpoint::GenerateCompletion.path(self.scheme);
        self.post(Endpoint::GenerateCompletion, path, request).await
    }
}

/// Check the status, then decode the body as JSON.
async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> SourceResult<T> {
    let status = response.status();
    if !status.is_success() {
        warn!(path, status = status.as_u16(), "Backend returned an error status");
        return Err(SourceError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SourceError::from_reqwest(path, e))?;

    serde_json::from_slice(&body).map_err(|e| SourceError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Model ids are interpolated into the route, so keep them path-safe.
fn validate_model_id(model_id: &str) -> SourceResult<()> {
    let valid = !model_id.is_empty()
        && model_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(SourceError::InvalidRequest(format!(
            "invalid model id '{}'",
            model_id
        )))
    }
}
