//! Data sources.
//!
//! A [`DataSource`] is either the in-process mock matrix or an HTTP client
//! for a real backend. The variant is chosen once, at construction, from the
//! configuration; both variants expose the same operations so callers never
//! know which one served them.

mod error;
mod live;
mod mock;
mod paths;

pub use error::{SourceError, SourceResult};
pub use live::LiveSource;
pub use mock::{
    MockSource, CPU_USAGE_RANGE, GPU_TEMPERATURE_RANGE, MEMORY_USAGE_RANGE, REQUEST_RATE_RANGE,
};
pub use paths::{Endpoint, PathScheme, MODEL_ID_PLACEHOLDER};

use tracing::info;

use crate::config::DashboardConfig;
use crate::models::{
    BenchmarkSnapshot, BenchmarkTrend, Completion, CompletionRequest, HealthStatus, LoadAck,
    MetricsSnapshot, ModelInfo, PerformanceReport, SaveAck, SettingsState,
};

/// Mock or live provider of every dashboard operation.
pub enum DataSource {
    Mock(MockSource),
    Live(LiveSource),
}

impl DataSource {
    /// Select the variant for this configuration.
    ///
    /// Mock is used when `api.use_mock` is set or no base URL is configured.
    pub fn from_config(config: &DashboardConfig) -> SourceResult<Self> {
        let source = if config.use_mock() {
            DataSource::Mock(MockSource::new(config.display.clone()))
        } else {
            DataSource::Live(LiveSource::new(&config.api)?)
        };
        info!("Data source: {}", source.describe());
        Ok(source)
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, DataSource::Mock(_))
    }

    /// Short description for logs and headers.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Mock(_) => "mock".to_string(),
            DataSource::Live(live) => {
                format!("live ({}, {} routes)", live.base_url(), live.scheme().label())
            }
        }
    }

    pub async fn health(&self) -> SourceResult<HealthStatus> {
        match self {
            DataSource::Mock(mock) => Ok(mock.health()),
            DataSource::Live(live) => live.health().await,
        }
    }

    pub async fn metrics(&self) -> SourceResult<MetricsSnapshot> {
        match self {
            DataSource::Mock(mock) => Ok(mock.metrics()),
            DataSource::Live(live) => live.metrics().await,
        }
    }

    pub async fn settings(&self) -> SourceResult<SettingsState> {
        match self {
            DataSource::Mock(mock) => Ok(mock.settings()),
            DataSource::Live(live) => live.settings().await,
        }
    }

    pub async fn update_settings(&self, settings: &SettingsState) -> SourceResult<SaveAck> {
        match self {
            DataSource::Mock(mock) => Ok(mock.update_settings(settings)),
            DataSource::Live(live) => live.update_settings(settings).await,
        }
    }

    pub async fn model_info(&self) -> SourceResult<ModelInfo> {
        match self {
            DataSource::Mock(mock) => Ok(mock.model_info()),
            DataSource::Live(live) => live.model_info().await,
        }
    }

    pub async fn load_model(&self, model_id: &str) -> SourceResult<LoadAck> {
        match self {
            DataSource::Mock(mock) => Ok(mock.load_model(model_id)),
            DataSource::Live(live) => live.load_model(model_id).await,
        }
    }

    pub async fn benchmarks(&self) -> SourceResult<BenchmarkSnapshot> {
        match self {
            DataSource::Mock(mock) => Ok(mock.benchmarks()),
            DataSource::Live(live) => live.benchmarks().await,
        }
    }

    pub async fn performance_stats(&self) -> SourceResult<PerformanceReport> {
        match self {
            DataSource::Mock(mock) => Ok(mock.performance_stats()),
            DataSource::Live(live) => live.performance_stats().await,
        }
    }

    pub async fn benchmark_trend(&self) -> SourceResult<BenchmarkTrend> {
        match self {
            DataSource::Mock(mock) => Ok(mock.benchmark_trend()),
            DataSource::Live(live) => live.benchmark_trend().await,
        }
    }

    pub async fn generate_completion(&self, request: &CompletionRequest) -> SourceResult<Completion> {
        match self {
            DataSource::Mock(mock) => Ok(mock.generate_completion(request)),
            DataSource::Live(live) => live.generate_completion(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(base_url: &str, use_mock: bool) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.api.base_url = base_url.to_string();
        config.api.use_mock = use_mock;
        config
    }

    #[test]
    fn selects_variant_from_config() {
        assert!(DataSource::from_config(&config_with("", false)).unwrap().is_mock());
        assert!(DataSource::from_config(&config_with("http://x", true)).unwrap().is_mock());

        let live = DataSource::from_config(&config_with("http://backend:8000/", false)).unwrap();
        assert!(!live.is_mock());
        assert_eq!(live.describe(), "live (http://backend:8000, legacy routes)");
    }

    #[tokio::test]
    async fn mock_mode_never_touches_the_network() {
        // The URL is unreachable; every call must still succeed
        let source = DataSource::from_config(&config_with("http://127.0.0.1:9", true)).unwrap();

        for _ in 0..3 {
            source.health().await.unwrap();
            source.metrics().await.unwrap();
            source.settings().await.unwrap();
            source.model_info().await.unwrap();
            source.benchmarks().await.unwrap();
            source.performance_stats().await.unwrap();
            source.benchmark_trend().await.unwrap();
        }

        match &source {
            DataSource::Mock(mock) => assert_eq!(mock.call_count(), 21),
            DataSource::Live(_) => unreachable!(),
        }
    }
}
