//! Route layout shared by the live client and the mock server.
//!
//! Two layouts exist in the wild: plain (`/system/metrics`) and
//! `/api`-prefixed (`/api/system/metrics`). Which one a backend speaks is
//! configuration, not contract.

use serde::{Deserialize, Serialize};

/// Placeholder for the model id in [`Endpoint::LoadModel`] routes.
pub const MODEL_ID_PLACEHOLDER: &str = "{id}";

/// Route layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathScheme {
    /// `/system/...`, `/models/...`
    #[default]
    Legacy,
    /// `/api/system/...`, `/api/benchmarks/...`
    Prefixed,
}

impl PathScheme {
    pub fn label(&self) -> &'static str {
        match self {
            PathScheme::Legacy => "legacy",
            PathScheme::Prefixed => "prefixed",
        }
    }
}

/// Every backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Metrics,
    GetSettings,
    UpdateSettings,
    ModelInfo,
    LoadModel,
    Benchmarks,
    PerformanceStats,
    BenchmarkTrend,
    GenerateCompletion,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [
        Endpoint::Health,
        Endpoint::Metrics,
        Endpoint::GetSettings,
        Endpoint::UpdateSettings,
        Endpoint::ModelInfo,
        Endpoint::LoadModel,
        Endpoint::Benchmarks,
        Endpoint::PerformanceStats,
        Endpoint::BenchmarkTrend,
        Endpoint::GenerateCompletion,
    ];

    /// Operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Health => "get health",
            Endpoint::Metrics => "get metrics",
            Endpoint::GetSettings => "get settings",
            Endpoint::UpdateSettings => "update settings",
            Endpoint::ModelInfo => "get model info",
            Endpoint::LoadModel => "load model",
            Endpoint::Benchmarks => "get benchmarks",
            Endpoint::PerformanceStats => "get performance stats",
            Endpoint::BenchmarkTrend => "get benchmark trend",
            Endpoint::GenerateCompletion => "generate completion",
        }
    }

    /// Route for this endpoint. `LoadModel` contains [`MODEL_ID_PLACEHOLDER`].
    pub fn path(&self, scheme: PathScheme) -> &'static str {
        match scheme {
            PathScheme::Legacy => match self {
                Endpoint::Health => "/system/health",
                Endpoint::Metrics => "/system/metrics",
                Endpoint::GetSettings | Endpoint::UpdateSettings => "/system/settings",
                Endpoint::ModelInfo => "/models/info",
                Endpoint::LoadModel => "/models/load/{id}",
                Endpoint::Benchmarks => "/models/benchmarks",
                Endpoint::PerformanceStats => "/models/performance",
                Endpoint::BenchmarkTrend => "/analytics/benchmarks/compare",
                Endpoint::GenerateCompletion => "/completions/generate",
            },
            PathScheme::Prefixed => match self {
                Endpoint::Health => "/api/system/health",
                Endpoint::Metrics => "/api/system/metrics",
                Endpoint::GetSettings | Endpoint::UpdateSettings => "/api/system/settings",
                Endpoint::ModelInfo => "/api/models/info",
                Endpoint::LoadModel => "/api/models/load/{id}",
                Endpoint::Benchmarks => "/api/benchmarks",
                Endpoint::PerformanceStats => "/api/benchmarks/performance",
                Endpoint::BenchmarkTrend => "/api/analytics/benchmarks/compare",
                Endpoint::GenerateCompletion => "/api/completions",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_scheme_adds_api_prefix() {
        for endpoint in Endpoint::ALL {
            assert!(endpoint.path(PathScheme::Prefixed).starts_with("/api/"));
            assert!(!endpoint.path(PathScheme::Legacy).starts_with("/api/"));
        }
    }

    #[test]
    fn load_model_route_has_placeholder() {
        assert!(Endpoint::LoadModel
            .path(PathScheme::Legacy)
            .ends_with(MODEL_ID_PLACEHOLDER));
    }
}
