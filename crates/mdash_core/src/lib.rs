//! Model Dashboard Core - data plumbing for the model dashboard
//!
//! This crate contains everything except presentation:
//! - Configuration (TOML file + environment overrides)
//! - Logging setup
//! - Display snapshots (metrics, benchmarks, settings)
//! - Mock and live data sources behind one operation set
//! - Pollers and presenters for periodically refreshed panels
//!
//! It can be driven by the terminal front-end or any other UI.

pub mod config;
pub mod logging;
pub mod models;
pub mod panels;
pub mod poller;
pub mod presenter;
pub mod server;
pub mod settings_editor;
pub mod source;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
