//! Config manager for loading, saving, and environment overrides.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Default file generation with section comments
//! - Environment overrides applied once after loading

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::settings::{ConfigSection, DashboardConfig};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "MDASH_API_URL";
/// Environment variable overriding `api.use_mock` (`true`/`1`/`yes`).
pub const ENV_USE_MOCK: &str = "MDASH_USE_MOCK_API";
/// Environment variable overriding `display.model_name`.
pub const ENV_MODEL_NAME: &str = "MDASH_MODEL_NAME";
/// Environment variable overriding `display.model_version`.
pub const ENV_MODEL_VERSION: &str = "MDASH_MODEL_VERSION";
/// Environment variable overriding `display.company_name`.
pub const ENV_COMPANY_NAME: &str = "MDASH_COMPANY_NAME";

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages the dashboard configuration file.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current configuration loaded in memory.
    config: DashboardConfig,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            config: DashboardConfig::default(),
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Get a mutable reference to the current configuration.
    ///
    /// Note: Changes made here are only in memory until `save()` is called.
    pub fn config_mut(&mut self) -> &mut DashboardConfig {
        &mut self.config
    }

    /// Consume the manager, returning the configuration.
    pub fn into_config(self) -> DashboardConfig {
        self.config
    }

    /// Load config from file.
    ///
    /// Returns error if file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.config = toml::from_str(&content)?;
        Ok(())
    }

    /// Load config from file, creating it with defaults if it doesn't exist.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            self.load()
        } else {
            self.config = DashboardConfig::default();
            self.save()?;
            debug!("Wrote default config to {}", self.config_path.display());
            Ok(())
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unset and empty values leave the file value in place, except for the
    /// API URL where an explicitly empty value disables the backend.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.config.api.base_url = url;
        }
        if let Some(flag) = lookup(ENV_USE_MOCK) {
            self.config.api.use_mock = parse_flag(&flag);
        }

        let display = &mut self.config.display;
        for (key, field) in [
            (ENV_MODEL_NAME, &mut display.model_name),
            (ENV_MODEL_VERSION, &mut display.model_version),
            (ENV_COMPANY_NAME, &mut display.company_name),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Generate config content with a comment above each section.
    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();

        output.push_str("# Model Dashboard Configuration\n");
        output.push_str("# MDASH_* environment variables override values in this file.\n\n");

        for section in ConfigSection::ALL {
            let body = match section {
                ConfigSection::Api => toml::to_string_pretty(&self.config.api)?,
                ConfigSection::Display => toml::to_string_pretty(&self.config.display)?,
                ConfigSection::Polling => toml::to_string_pretty(&self.config.polling)?,
                ConfigSection::Logging => toml::to_string_pretty(&self.config.logging)?,
            };

            output.push_str(&format!("# {}\n", section.description()));
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in body.lines() {
                output.push_str(line);
                output.push('\n');
            }
            output.push('\n');
        }

        Ok(output)
    }

    /// Write content to config file atomically.
    ///
    /// Writes to a temp file first, then renames.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    use crate::source::PathScheme;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("dashboard.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[api]"));
        assert!(content.contains("[display]"));
        assert!(content.contains("[polling]"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn generated_file_parses_back() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dashboard.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.config_mut().api.path_scheme = PathScheme::Prefixed;
        manager.config_mut().polling.metrics_ms = 1_234;
        manager.save().unwrap();

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.config(), manager.config());
    }

    #[test]
    fn load_or_create_preserves_existing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dashboard.toml");

        fs::write(&config_path, "[api]\nbase_url = \"http://metrics.internal\"\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.config().api.base_url, "http://metrics.internal");
        assert_eq!(manager.config().display.model_name, "june13525");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://override:9000"),
            (ENV_USE_MOCK, "TRUE"),
            (ENV_MODEL_NAME, "june-x"),
            (ENV_COMPANY_NAME, ""),
        ]);

        let mut manager = ConfigManager::new("unused.toml");
        manager.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        let config = manager.config();
        assert_eq!(config.api.base_url, "http://override:9000");
        assert!(config.api.use_mock);
        assert_eq!(config.display.model_name, "june-x");
        // Empty values keep the existing string
        assert_eq!(config.display.company_name, "Indai Co.");
        assert_eq!(config.display.model_version, "Standard");
    }

    #[test]
    fn empty_url_override_enables_mock() {
        let mut manager = ConfigManager::new("unused.toml");
        manager.apply_overrides(|key| (key == ENV_API_URL).then(String::new));
        assert!(manager.config().use_mock());
    }

    #[test]
    fn atomic_write_creates_no_temp_on_success() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dashboard.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let temp_path = config_path.with_extension("toml.tmp");
        assert!(!temp_path.exists());
    }
}
