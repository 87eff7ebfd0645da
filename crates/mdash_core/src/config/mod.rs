//! Configuration management for the model dashboard.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Environment overrides (`MDASH_*`) applied once at startup
//!
//! The resulting [`DashboardConfig`] is built once and passed by reference
//! (or `Arc`) to everything that needs it.
//!
//! # Example
//!
//! ```no_run
//! use mdash_core::config::ConfigManager;
//!
//! let mut manager = ConfigManager::new(".config/dashboard.toml");
//! manager.load_or_create().unwrap();
//! manager.apply_env_overrides();
//!
//! let config = manager.into_config();
//! println!("Mock mode: {}", config.use_mock());
//! ```

mod manager;
mod settings;

pub use manager::{
    ConfigError, ConfigManager, ConfigResult, ENV_API_URL, ENV_COMPANY_NAME, ENV_MODEL_NAME,
    ENV_MODEL_VERSION, ENV_USE_MOCK,
};
pub use settings::{
    ApiSettings, ConfigSection, DashboardConfig, DisplaySettings, LoggingSettings,
    PollingSettings,
};
