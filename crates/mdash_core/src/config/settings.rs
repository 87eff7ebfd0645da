//! Dashboard configuration with TOML-based sections.
//!
//! The configuration is read once at startup, adjusted by environment
//! overrides, and then shared read-only (usually behind an `Arc`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::source::PathScheme;

/// Root configuration containing all sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Product strings shown in the dashboard.
    #[serde(default)]
    pub display: DisplaySettings,

    /// Refresh intervals per panel.
    #[serde(default)]
    pub polling: PollingSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl DashboardConfig {
    /// Whether data operations should be served by the mock source.
    ///
    /// Mock mode is used when explicitly requested or when no backend
    /// URL is configured.
    pub fn use_mock(&self) -> bool {
        self.api.use_mock || self.api.base_url.trim().is_empty()
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the dashboard backend. Empty means "no backend".
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Serve every operation from the in-process mock matrix.
    #[serde(default)]
    pub use_mock: bool,

    /// Which route layout the backend uses.
    #[serde(default)]
    pub path_scheme: PathScheme,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl ApiSettings {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            use_mock: false,
            path_scheme: PathScheme::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Product strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Name of the model this dashboard presents ("self" in comparisons).
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Model edition label.
    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Vendor name.
    #[serde(default = "default_company_name")]
    pub company_name: String,
}

fn default_model_name() -> String {
    "june13525".to_string()
}

fn default_model_version() -> String {
    "Standard".to_string()
}

fn default_company_name() -> String {
    "Indai Co.".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            model_version: default_model_version(),
            company_name: default_company_name(),
        }
    }
}

/// Refresh intervals in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Home page metrics.
    #[serde(default = "default_metrics_ms")]
    pub metrics_ms: u64,

    /// System info widget (metrics + benchmarks).
    #[serde(default = "default_system_info_ms")]
    pub system_info_ms: u64,

    /// Benchmark page.
    #[serde(default = "default_benchmarks_ms")]
    pub benchmarks_ms: u64,

    /// Model load status.
    #[serde(default = "default_model_status_ms")]
    pub model_status_ms: u64,

    /// Backend health check in the header.
    #[serde(default = "default_health_ms")]
    pub health_ms: u64,
}

fn default_metrics_ms() -> u64 {
    5_000
}

fn default_system_info_ms() -> u64 {
    5_000
}

fn default_benchmarks_ms() -> u64 {
    30_000
}

fn default_model_status_ms() -> u64 {
    10_000
}

fn default_health_ms() -> u64 {
    60_000
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            metrics_ms: default_metrics_ms(),
            system_info_ms: default_system_info_ms(),
            benchmarks_ms: default_benchmarks_ms(),
            model_status_ms: default_model_status_ms(),
            health_ms: default_health_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Directory for rolling log files. Empty disables file output.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            log_dir: String::new(),
        }
    }
}

/// Names of config sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Api,
    Display,
    Polling,
    Logging,
}

impl ConfigSection {
    /// All sections in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Api,
        ConfigSection::Display,
        ConfigSection::Polling,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Api => "api",
            ConfigSection::Display => "display",
            ConfigSection::Polling => "polling",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Api => "Backend connection (empty base_url or use_mock = true serves mock data)",
            ConfigSection::Display => "Product strings shown in the dashboard",
            ConfigSection::Polling => "Refresh intervals in milliseconds",
            ConfigSection::Logging => "Logging (RUST_LOG overrides level)",
        }
    }
}
