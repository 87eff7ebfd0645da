//! Mock backend over HTTP.
//!
//! Serves the [`MockSource`] matrix on either route layout, so the live
//! source can be exercised without a real backend.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::models::{
    BenchmarkSnapshot, BenchmarkTrend, Completion, CompletionRequest, HealthStatus, LoadAck,
    MetricsSnapshot, ModelInfo, PerformanceReport, SaveAck, SettingsState,
};
use crate::source::{Endpoint, MockSource, PathScheme};

type Shared = State<Arc<MockSource>>;

/// Build the router for `scheme`.
pub fn router(source: Arc<MockSource>, scheme: PathScheme) -> Router {
    Router::new()
        .route(Endpoint::Health.path(scheme), get(health))
        .route(Endpoint::Metrics.path(scheme), get(metrics))
        .route(
            Endpoint::GetSettings.path(scheme),
            get(settings).post(update_settings),
        )
        .route(Endpoint::ModelInfo.path(scheme), get(model_info))
        .route(Endpoint::LoadModel.path(scheme), post(load_model))
        .route(Endpoint::Benchmarks.path(scheme), get(benchmarks))
        .route(Endpoint::PerformanceStats.path(scheme), get(performance_stats))
        .route(Endpoint::BenchmarkTrend.path(scheme), get(benchmark_trend))
        .route(Endpoint::GenerateCompletion.path(scheme), post(generate_completion))
        .with_state(source)
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, source: Arc<MockSource>, scheme: PathScheme) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!("Mock backend listening on http://{} ({:?} routes)", addr, scheme);
    axum::serve(listener, router(source, scheme)).await
}

/// Bind `addr` and serve in a background task, returning the bound address.
pub async fn spawn(
    addr: SocketAddr,
    source: Arc<MockSource>,
    scheme: PathScheme,
) -> io::Result<(SocketAddr, tokio::task::JoinHandle<io::Result<()>>)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let task = tokio::spawn(serve(listener, source, scheme));
    Ok((local_addr, task))
}

async fn health(State(source): Shared) -> Json<HealthStatus> {
    Json(source.health())
}

async fn metrics(State(source): Shared) -> Json<MetricsSnapshot> {
    Json(source.metrics())
}

async fn settings(State(source): Shared) -> Json<SettingsState> {
    Json(source.settings())
}

async fn update_settings(
    State(source): Shared,
    Json(settings): Json<SettingsState>,
) -> Json<SaveAck> {
    Json(source.update_settings(&settings))
}

async fn model_info(State(source): Shared) -> Json<ModelInfo> {
    Json(source.model_info())
}

async fn load_model(State(source): Shared, Path(id): Path<String>) -> Json<LoadAck> {
    Json(source.load_model(&id))
}

async fn benchmarks(State(source): Shared) -> Json<BenchmarkSnapshot> {
    Json(source.benchmarks())
}

async fn performance_stats(State(source): Shared) -> Json<PerformanceReport> {
    Json(source.performance_stats())
}

async fn benchmark_trend(State(source): Shared) -> Json<BenchmarkTrend> {
    Json(source.benchmark_trend())
}

async fn generate_completion(
    State(source): Shared,
    Json(request): Json<CompletionRequest>,
) -> Result<Json<Completion>, (StatusCode, String)> {
    if request.prompt.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "prompt must not be empty".to_string()));
    }
    Ok(Json(source.generate_completion(&request)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplaySettings;

    #[tokio::test]
    async fn spawn_binds_ephemeral_port() {
        let source = Arc::new(MockSource::with_seed(DisplaySettings::default(), 11));
        let (addr, task) = spawn("127.0.0.1:0".parse().unwrap(), source.clone(), PathScheme::Prefixed)
            .await
            .unwrap();
        assert_ne!(addr.port(), 0);

        let body: serde_json::Value = reqwest::get(format!("http://{}/api/system/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(source.call_count(), 1);

        task.abort();
    }

    #[tokio::test]
    async fn empty_prompt_is_bad_request() {
        let source = Arc::new(MockSource::with_seed(DisplaySettings::default(), 11));
        let (addr, task) = spawn("127.0.0.1:0".parse().unwrap(), source, PathScheme::Legacy)
            .await
            .unwrap();

        let response = reqwest::Client::new()
            .post(format!("http://{}/completions/generate", addr))
            .json(&serde_json::json!({"prompt": " ", "temperature": 0.7, "top_p": 0.95, "max_tokens": 16}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        task.abort();
    }
}
