//! One-shot subcommands.
//!
//! Each command returns the text to print so `main` owns stdout.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use mdash_core::config::DashboardConfig;
use mdash_core::models::CompletionRequest;
use mdash_core::panels::load_benchmark_page;
use mdash_core::presenter::Presenter;
use mdash_core::server;
use mdash_core::settings_editor::SettingsEditor;
use mdash_core::source::{DataSource, MockSource};

use crate::app;
use crate::cli::{Command, SettingsAction};
use crate::render::{render_benchmarks, render_settings};

/// Dispatch a subcommand. Returns the output to print, if any.
pub async fn run(command: Command, config: Arc<DashboardConfig>) -> Result<Option<String>> {
    let output = match command {
        Command::Serve { port } => {
            serve(&config, port).await?;
            return Ok(None);
        }
        Command::Watch { duration } => {
            let source = open_source(&config)?;
            app::watch(source, config, duration.map(Duration::from_secs)).await?;
            return Ok(None);
        }
        Command::Benchmarks => benchmarks(&*open_source(&config)?, &config).await?,
        Command::Settings { action } => {
            settings(&*open_source(&config)?, action.unwrap_or(SettingsAction::Show)).await?
        }
        Command::Complete {
            prompt,
            temperature,
            max_tokens,
        } => complete(&*open_source(&config)?, prompt, temperature, max_tokens).await?,
        Command::LoadModel { id } => {
            let id = id.unwrap_or_else(|| config.display.model_name.clone());
            load_model(&*open_source(&config)?, &id).await?
        }
    };
    Ok(Some(output))
}

fn open_source(config: &DashboardConfig) -> Result<Arc<DataSource>> {
    let source = DataSource::from_config(config).context("Failed to create data source")?;
    Ok(Arc::new(source))
}

pub async fn benchmarks(source: &DataSource, config: &DashboardConfig) -> Result<String> {
    let page = load_benchmark_page(source)
        .await
        .context("Failed to load benchmarks")?;

    let presenter = Presenter::new("benchmarks");
    presenter.apply(Ok(page));

    let mut out = String::new();
    render_benchmarks(&mut out, &presenter.current(), &config.display.model_name);
    Ok(out)
}

pub async fn settings(source: &DataSource, action: SettingsAction) -> Result<String> {
    let mut editor = SettingsEditor::load(source)
        .await
        .context("Failed to load settings")?;

    match action {
        SettingsAction::Show => Ok(render_settings(editor.saved())),
        SettingsAction::Set {
            variant,
            context_length,
            memory_limit,
            threads,
        } => {
            if let Some(variant) = variant {
                editor.set_variant(variant);
            }
            if let Some(tokens) = context_length {
                editor.set_context_length(tokens);
            }
            if let Some(gb) = memory_limit {
                editor.set_memory_limit(gb);
            }
            if let Some(threads) = threads {
                editor.set_thread_count(threads);
            }

            if !editor.is_dirty() {
                return Ok(format!("No changes.\n{}", render_settings(editor.saved())));
            }

            let ack = editor.save(source).await.context("Failed to save settings")?;
            if !ack.success {
                bail!("Backend rejected the settings");
            }
            Ok(format!("Settings saved.\n{}", render_settings(editor.saved())))
        }
    }
}

pub async fn complete(source: &DataSource, prompt: String, temperature: f32, max_tokens: u32) -> Result<String> {
    let request = CompletionRequest::new(prompt)?
        .with_temperature(temperature)
        .with_max_tokens(max_tokens);

    let completion = source
        .generate_completion(&request)
        .await
        .context("Failed to generate completion")?;
    Ok(completion.completion)
}

pub async fn load_model(source: &DataSource, id: &str) -> Result<String> {
    let ack = source
        .load_model(id)
        .await
        .with_context(|| format!("Failed to load model {}", id))?;
    if !ack.success {
        bail!(
            "Backend refused to load {}: {}",
            id,
            ack.message.as_deref().unwrap_or("no reason given")
        );
    }
    Ok(ack.message.unwrap_or_else(|| format!("{} loaded", id)))
}

/// Serve the mock backend on localhost until Ctrl-C.
pub async fn serve(config: &DashboardConfig, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let source = Arc::new(MockSource::new(config.display.clone()));

    println!(
        "Mock backend on http://{} ({} routes). Ctrl-C to stop.",
        listener.local_addr()?,
        config.api.path_scheme.label()
    );

    tokio::select! {
        result = server::serve(listener, source, config.api.path_scheme) => {
            result.context("Mock backend failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Mock backend stopped");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdash_core::config::DisplaySettings;
    use mdash_core::models::ModelVariant;

    fn mock() -> DataSource {
        DataSource::Mock(MockSource::with_seed(DisplaySettings::default(), 21))
    }

    #[tokio::test]
    async fn benchmarks_render_self_row_first() {
        let out = benchmarks(&mock(), &DashboardConfig::default()).await.unwrap();
        let table_row = out.lines().find(|line| line.starts_with('>')).unwrap();
        assert!(table_row.contains("june13525"));
        assert!(out.contains("GPT-4o"));
        assert!(out.contains("+348%"));
    }

    #[tokio::test]
    async fn settings_set_snaps_and_saves() {
        let source = mock();
        let out = settings(
            &source,
            SettingsAction::Set {
                variant: Some(ModelVariant::Pro),
                context_length: Some(9_000),
                memory_limit: None,
                threads: Some(64),
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("Settings saved."));
        assert!(out.contains("Context length  9216 tokens"));
        assert!(out.contains("Threads         32"));

        let shown = settings(&source, SettingsAction::Show).await.unwrap();
        assert!(shown.contains("Model variant   Pro"));
    }

    #[tokio::test]
    async fn unchanged_settings_are_not_sent() {
        let out = settings(
            &mock(),
            SettingsAction::Set {
                variant: None,
                context_length: None,
                memory_limit: None,
                threads: None,
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("No changes."));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let err = complete(&mock(), "   ".to_string(), 0.7, 16).await.unwrap_err();
        assert!(err.to_string().contains("Invalid request"));
    }

    #[tokio::test]
    async fn load_model_reports_backend_message() {
        let out = load_model(&mock(), "june13525").await.unwrap();
        assert_eq!(out, "june13525 is already loaded");
    }
}
