//! Plain-text rendering of dashboard panels.

use std::fmt::Write;

use chrono::Local;

use mdash_core::config::DisplaySettings;
use mdash_core::models::{
    benchmark_label, BenchmarkSnapshot, HealthStatus, MetricsSnapshot, ModelInfo, ModelStatus,
    Percentage, SettingsState,
};
use mdash_core::panels::{BenchmarkPage, Dashboard, SystemOverview};
use mdash_core::presenter::ViewState;

const GAUGE_WIDTH: usize = 20;
const MODEL_COLUMN: usize = 18;
const SCORE_COLUMN: usize = 14;

/// `[#########...........]` for a 0.0-1.0 fraction.
pub fn gauge(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}

/// `2d 3h 14m`, dropping leading zero units.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    match (days, hours) {
        (0, 0) => format!("{}m", minutes),
        (0, _) => format!("{}h {}m", hours, minutes),
        _ => format!("{}d {}h {}m", days, hours, minutes),
    }
}

fn status_label(status: ModelStatus) -> &'static str {
    match status {
        ModelStatus::Loaded => "loaded",
        ModelStatus::Loading => "loading",
        ModelStatus::Unloaded => "unloaded",
        ModelStatus::Unknown => "unknown",
    }
}

/// Render a panel body, or its loading/error placeholder.
///
/// Ready panels with a failed refresh get a stale marker under the title.
fn panel<T>(out: &mut String, title: &str, state: &ViewState<T>, body: impl FnOnce(&mut String, &T)) {
    let _ = writeln!(out, "== {} ==", title);
    match state {
        ViewState::Loading => {
            let _ = writeln!(out, "  Loading...");
        }
        ViewState::Error(failure) => {
            let _ = writeln!(out, "  Error: {}", failure.message);
            if failure.retryable {
                let _ = writeln!(out, "  (r + Enter to retry)");
            } else {
                let _ = writeln!(out, "  (check the backend URL and route scheme)");
            }
        }
        ViewState::Ready(ready) => {
            if let Some(stale) = &ready.stale_error {
                let _ = writeln!(
                    out,
                    "  [stale since {}] {}",
                    ready.updated_at.with_timezone(&Local).format("%H:%M:%S"),
                    stale.message
                );
            }
            body(out, ready.value.as_ref());
        }
    }
    out.push('\n');
}

pub fn render_metrics(out: &mut String, state: &ViewState<MetricsSnapshot>) {
    panel(out, "System Metrics", state, |out, metrics| {
        let _ = writeln!(out, "  Status        {}", metrics.status);
        let _ = writeln!(
            out,
            "  CPU           {} {:5.1}%",
            gauge(metrics.cpu_usage / 100.0),
            metrics.cpu_usage
        );
        let _ = writeln!(
            out,
            "  Memory        {} {:5.1}%",
            gauge(metrics.memory_usage / 100.0),
            metrics.memory_usage
        );
        if let Some(temperature) = metrics.effective_gpu_temperature() {
            let _ = writeln!(out, "  GPU temp      {} {:5.1}C", gauge(temperature / 100.0), temperature);
        }
        let _ = writeln!(out, "  Requests      {:.0}/s", metrics.request_rate);
        let _ = writeln!(out, "  Uptime        {}", format_uptime(metrics.uptime_secs));
    });
}

pub fn render_system(out: &mut String, state: &ViewState<SystemOverview>) {
    panel(out, "System Info", state, |out, overview| {
        if let Some(disk) = overview.disk_space() {
            let _ = writeln!(
                out,
                "  Disk          {} used {} of {} ({} free)",
                gauge(disk.used_fraction().unwrap_or_default()),
                disk.used,
                disk.total,
                disk.free
            );
        }
        if let Some(gpu) = overview.gpu() {
            let _ = writeln!(out, "  GPU           {} ({}), {:.0}C", gpu.name, gpu.memory_total, gpu.temperature);
        }
        if let Some(model) = overview.model() {
            let _ = writeln!(
                out,
                "  Model         {} {} ({} params, {} token context)",
                model.name, model.version, model.parameters, model.context_window
            );
        }
        let results = &overview.benchmarks.results;
        let scores: Vec<String> = overview
            .benchmarks
            .metric_names()
            .iter()
            .filter_map(|name| results.scores.get(name).map(|pct| format!("{} {}", benchmark_label(name), pct)))
            .collect();
        if !scores.is_empty() {
            let _ = writeln!(out, "  Scores        {}", scores.join(", "));
        }
    });
}

/// Comparison table with the presented model first, marked with `>`.
pub fn render_comparison(out: &mut String, snapshot: &BenchmarkSnapshot, self_model: &str) {
    let metrics = snapshot.metric_names();

    let _ = write!(out, "  {:<width$}", "Model", width = MODEL_COLUMN);
    for name in &metrics {
        let _ = write!(out, "{:>width$}", benchmark_label(name), width = SCORE_COLUMN);
    }
    out.push('\n');

    for row in snapshot.display_rows(self_model) {
        let marker = if row.highlighted { '>' } else { ' ' };
        let _ = write!(out, "{} {:<width$}", marker, row.model, width = MODEL_COLUMN);
        for name in &metrics {
            let cell = row
                .scores
                .get(name)
                .map(Percentage::to_string)
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, "{:>width$}", cell, width = SCORE_COLUMN);
        }
        out.push('\n');
    }
}

pub fn render_benchmarks(out: &mut String, state: &ViewState<BenchmarkPage>, self_model: &str) {
    panel(out, "Benchmarks", state, |out, page| {
        if let Some(meta) = &page.snapshot.meta {
            let _ = writeln!(
                out,
                "  {} ({} tests)",
                meta.name.as_deref().unwrap_or("Benchmark suite"),
                meta.test_count
            );
        }
        render_comparison(out, &page.snapshot, self_model);

        let deltas = page.performance.deltas();
        if !deltas.is_empty() {
            let _ = writeln!(out, "  Improvement over previous generation:");
            for (name, delta) in deltas {
                let _ = writeln!(out, "    {:<22} {:+.0}%", name, delta.value());
            }
        }
        for category in &page.performance.test_categories {
            let _ = writeln!(
                out,
                "    {:<22} {} {}",
                category.name,
                gauge(category.score.clamped() / 100.0),
                category.score
            );
        }
        if !page.trend.improvement_trend.is_empty() {
            let _ = writeln!(out, "  Trend: {}", page.trend.improvement_trend);
        }
    });
}

pub fn render_model_status(out: &mut String, state: &ViewState<ModelInfo>) {
    panel(out, "Model", state, |out, info| {
        let _ = writeln!(
            out,
            "  {} {} is {} ({} params)",
            info.name,
            info.version,
            status_label(info.status),
            info.parameters
        );
    });
}

pub fn render_settings(settings: &SettingsState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model variant   {}", settings.model_variant);
    let _ = writeln!(out, "Context length  {} tokens", settings.context_length);
    let _ = writeln!(out, "Memory limit    {} GB", settings.memory_limit_gb);
    let _ = writeln!(out, "Threads         {}", settings.thread_count);
    if let Some(version) = &settings.version {
        let _ = writeln!(out, "Version         {}", version);
    }
    if let Some(build_date) = &settings.build_date {
        let _ = writeln!(out, "Build date      {}", build_date);
    }
    out
}

/// One-line backend health for the header.
pub fn render_health(state: &ViewState<HealthStatus>) -> String {
    match state {
        ViewState::Loading => "backend: checking".to_string(),
        ViewState::Error(_) => "backend: unreachable".to_string(),
        ViewState::Ready(ready) => {
            let health = ready.value.as_ref();
            let mut line = if health.is_healthy() {
                format!("backend: healthy, up {}", format_uptime(health.uptime_secs))
            } else {
                format!("backend: {}", health.status)
            };
            if let Some(version) = &health.version {
                let _ = write!(line, " ({})", version);
            }
            if ready.is_stale() {
                line.push_str(" [stale]");
            }
            line
        }
    }
}

/// Full dashboard screen.
pub fn render_dashboard(dashboard: &Dashboard, display: &DisplaySettings, source: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} - {} ({} data, {})",
        display.model_name,
        display.model_version,
        display.company_name,
        source,
        Local::now().format("%H:%M:%S")
    );
    let _ = writeln!(out, "{}", render_health(&dashboard.health.current()));
    out.push('\n');

    render_model_status(&mut out, &dashboard.model_status.current());
    render_metrics(&mut out, &dashboard.metrics.current());
    render_system(&mut out, &dashboard.system.current());
    render_benchmarks(&mut out, &dashboard.benchmarks.current(), &display.model_name);

    out.push_str("r + Enter: refresh   q + Enter: quit\n");
    out
}
