//! Model Dashboard - Main entry point
//!
//! Terminal front-end for the dashboard core. It handles:
//! - Command-line parsing
//! - Configuration loading (file, then `MDASH_*` environment, then flags)
//! - Logging initialization
//! - Running the selected command on a Tokio runtime

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;

use mdash_core::config::ConfigManager;
use mdash_core::logging::{init_tracing, init_tracing_with_file};

mod app;
mod cli;
mod commands;
mod render;

use cli::Cli;

/// Default config path: the platform config dir, or `.config/dashboard.toml`
/// relative to the working directory when no home directory is known.
fn default_config_path() -> PathBuf {
    ProjectDirs::from("com", "Indai", "model-dashboard")
        .map(|dirs| dirs.config_dir().join("dashboard.toml"))
        .unwrap_or_else(|| PathBuf::from(".config").join("dashboard.toml"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for the log level and directory)
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config_manager = ConfigManager::new(&config_path);

    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }
    config_manager.apply_env_overrides();
    cli.apply_overrides(config_manager.config_mut());
    let config = Arc::new(config_manager.into_config());

    let level = (0..cli.verbose).fold(config.logging.level, |level, _| level.more_verbose());
    let log_dir = config.logging.log_dir.trim();
    let _log_guard = if log_dir.is_empty() {
        init_tracing(level);
        None
    } else {
        Some(init_tracing_with_file(level, Path::new(log_dir)))
    };

    tracing::info!("Model Dashboard starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", mdash_core::version());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let command = cli.command.unwrap_or_default();
    if let Some(output) = runtime.block_on(commands::run(command, config))? {
        println!("{}", output.trim_end());
    }
    Ok(())
}
