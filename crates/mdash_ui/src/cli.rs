//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mdash_core::config::DashboardConfig;
use mdash_core::models::ModelVariant;

/// Model Dashboard - live metrics and benchmarks for a served model
#[derive(Parser, Debug)]
#[command(name = "model-dashboard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Serve simulated data instead of calling the backend
    #[arg(long, global = true)]
    pub mock: bool,

    /// Backend base URL (empty selects mock data)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Flags override both the config file and the environment.
    pub fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if self.mock {
            config.api.use_mock = true;
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the live dashboard (default)
    Watch {
        /// Exit after this many seconds
        #[arg(long, value_name = "SECS")]
        duration: Option<u64>,
    },

    /// Print the benchmark page once
    Benchmarks,

    /// Show or change backend settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Generate a completion
    Complete {
        /// Prompt text
        prompt: String,

        #[arg(long, default_value_t = 0.7)]
        temperature: f32,

        #[arg(long, default_value_t = 1024)]
        max_tokens: u32,
    },

    /// Ask the backend to load a model
    LoadModel {
        /// Model id (defaults to the configured model name)
        id: Option<String>,
    },

    /// Run the mock backend over HTTP
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Watch { duration: None }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SettingsAction {
    /// Print current settings (default)
    Show,

    /// Change settings; values are snapped into their allowed ranges
    Set {
        /// Standard, Pro, Ultra or Benchmark
        #[arg(long)]
        variant: Option<ModelVariant>,

        /// Context length in tokens (8192-32768)
        #[arg(long)]
        context_length: Option<u32>,

        /// Memory limit in GB (16-128)
        #[arg(long)]
        memory_limit: Option<u32>,

        /// Thread count (1-32)
        #[arg(long)]
        threads: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_watch() {
        let cli = Cli::parse_from(["model-dashboard"]);
        assert_eq!(cli.command.unwrap_or_default(), Command::Watch { duration: None });
    }

    #[test]
    fn parses_settings_set() {
        let cli = Cli::parse_from([
            "model-dashboard",
            "settings",
            "set",
            "--variant",
            "ultra",
            "--threads",
            "12",
        ]);
        assert_eq!(
            cli.command,
            Some(Command::Settings {
                action: Some(SettingsAction::Set {
                    variant: Some(ModelVariant::Ultra),
                    context_length: None,
                    memory_limit: None,
                    threads: Some(12),
                })
            })
        );
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["model-dashboard", "--api-url", "http://backend:9000", "--mock", "benchmarks"]);
        let mut config = DashboardConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert!(config.use_mock());
    }
}
