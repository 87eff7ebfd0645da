//! Dashboard panels.
//!
//! Each panel joins one or more source operations into a single value per
//! tick. A joined tick succeeds only when every operation does.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{try_join, try_join3};
use tracing::info;

use crate::config::{DashboardConfig, DisplaySettings};
use crate::models::{
    BenchmarkSnapshot, BenchmarkTrend, DiskSpace, GpuInfo, HealthStatus, MetricsSnapshot,
    ModelDescriptor, ModelInfo, PerformanceReport, DEFAULT_DISK_TOTAL_GB,
};
use crate::poller::{PollHandle, Poller};
use crate::presenter::Presenter;
use crate::source::{DataSource, SourceResult};

const DEFAULT_GPU_NAME: &str = "NVIDIA A100 80GB";
const DEFAULT_GPU_MEMORY: &str = "80GB";
const DEFAULT_CONTEXT_WINDOW: u32 = 32_768;
const DEFAULT_PARAMETERS: &str = "175B";

/// Metrics plus benchmarks for the system-info widget.
#[derive(Debug, Clone)]
pub struct SystemOverview {
    /// Metrics with disk, GPU and model blocks always present.
    pub metrics: MetricsSnapshot,
    pub benchmarks: BenchmarkSnapshot,
}

impl SystemOverview {
    /// Fill in the blocks the source left out.
    pub fn new(mut metrics: MetricsSnapshot, benchmarks: BenchmarkSnapshot, display: &DisplaySettings) -> Self {
        if metrics.disk_space.is_none() {
            metrics.disk_space = Some(DiskSpace::from_usage(DEFAULT_DISK_TOTAL_GB, metrics.disk_usage));
        }
        if metrics.gpu_info.is_none() {
            if let Some(temperature) = metrics.gpu_temperature {
                metrics.gpu_info = Some(GpuInfo {
                    name: DEFAULT_GPU_NAME.to_string(),
                    memory_total: DEFAULT_GPU_MEMORY.to_string(),
                    temperature,
                });
            }
        }
        if metrics.model_info.is_none() {
            metrics.model_info = Some(ModelDescriptor {
                name: display.model_name.clone(),
                version: display.model_version.clone(),
                context_window: DEFAULT_CONTEXT_WINDOW,
                parameters: DEFAULT_PARAMETERS.to_string(),
            });
        }
        Self { metrics, benchmarks }
    }

    pub fn disk_space(&self) -> Option<&DiskSpace> {
        self.metrics.disk_space.as_ref()
    }

    pub fn gpu(&self) -> Option<&GpuInfo> {
        self.metrics.gpu_info.as_ref()
    }

    pub fn model(&self) -> Option<&ModelDescriptor> {
        self.metrics.model_info.as_ref()
    }
}

/// Everything the benchmark page shows.
#[derive(Debug, Clone)]
pub struct BenchmarkPage {
    pub snapshot: BenchmarkSnapshot,
    pub performance: PerformanceReport,
    pub trend: BenchmarkTrend,
}

pub async fn load_metrics(source: &DataSource) -> SourceResult<MetricsSnapshot> {
    source.metrics().await
}

pub async fn load_system_overview(
    source: &DataSource,
    display: &DisplaySettings,
) -> SourceResult<SystemOverview> {
    let (metrics, benchmarks) = try_join(source.metrics(), source.benchmarks()).await?;
    Ok(SystemOverview::new(metrics, benchmarks, display))
}

pub async fn load_benchmark_page(source: &DataSource) -> SourceResult<BenchmarkPage> {
    let (snapshot, performance, trend) = try_join3(
        source.benchmarks(),
        source.performance_stats(),
        source.benchmark_trend(),
    )
    .await?;
    Ok(BenchmarkPage {
        snapshot,
        performance,
        trend,
    })
}

pub async fn load_model_status(source: &DataSource) -> SourceResult<ModelInfo> {
    source.model_info().await
}

pub async fn load_health(source: &DataSource) -> SourceResult<HealthStatus> {
    source.health().await
}

/// All panels, each polled on its own schedule.
pub struct Dashboard {
    pub metrics: Arc<Presenter<MetricsSnapshot>>,
    pub system: Arc<Presenter<SystemOverview>>,
    pub benchmarks: Arc<Presenter<BenchmarkPage>>,
    pub model_status: Arc<Presenter<ModelInfo>>,
    /// Backend health shown in the header.
    pub health: Arc<Presenter<HealthStatus>>,
    handles: Vec<PollHandle>,
}

impl Dashboard {
    /// Start one poller per panel. Must be called inside a Tokio runtime.
    pub fn start(source: Arc<DataSource>, config: Arc<DashboardConfig>) -> Self {
        let polling = &config.polling;
        let metrics = Arc::new(Presenter::new("metrics"));
        let system = Arc::new(Presenter::new("system"));
        let benchmarks = Arc::new(Presenter::new("benchmarks"));
        let model_status = Arc::new(Presenter::new("model-status"));
        let health = Arc::new(Presenter::new("health"));

        let mut handles = Vec::with_capacity(5);

        handles.push(
            Poller::new("metrics", Duration::from_millis(polling.metrics_ms)).start(
                {
                    let source = Arc::clone(&source);
                    move || {
                        let source = Arc::clone(&source);
                        async move { load_metrics(&source).await }
                    }
                },
                Arc::clone(&metrics),
            ),
        );

        handles.push(
            Poller::new("system", Duration::from_millis(polling.system_info_ms)).start(
                {
                    let source = Arc::clone(&source);
                    let config = Arc::clone(&config);
                    move || {
                        let source = Arc::clone(&source);
                        let config = Arc::clone(&config);
                        async move { load_system_overview(&source, &config.display).await }
                    }
                },
                Arc::clone(&system),
            ),
        );

        handles.push(
            Poller::new("benchmarks", Duration::from_millis(polling.benchmarks_ms)).start(
                {
                    let source = Arc::clone(&source);
                    move || {
                        let source = Arc::clone(&source);
                        async move { load_benchmark_page(&source).await }
                    }
                },
                Arc::clone(&benchmarks),
            ),
        );

        handles.push(
            Poller::new("model-status", Duration::from_millis(polling.model_status_ms)).start(
                {
                    let source = Arc::clone(&source);
                    move || {
                        let source = Arc::clone(&source);
                        async move { load_model_status(&source).await }
                    }
                },
                Arc::clone(&model_status),
            ),
        );

        handles.push(
            Poller::new("health", Duration::from_millis(polling.health_ms)).start(
                {
                    let source = Arc::clone(&source);
                    move || {
                        let source = Arc::clone(&source);
                        async move { load_health(&source).await }
                    }
                },
                Arc::clone(&health),
            ),
        );

        info!("Dashboard started with {} panels ({})", handles.len(), source.describe());

        Self {
            metrics,
            system,
            benchmarks,
            model_status,
            health,
            handles,
        }
    }

    pub fn handles(&self) -> &[PollHandle] {
        &self.handles
    }

    /// Re-issue every panel's fetch now.
    pub fn refresh_all(&self) {
        for handle in &self.handles {
            handle.refresh();
        }
    }

    pub fn stop(&self) {
        for handle in &self.handles {
            handle.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;

    fn mock_source() -> Arc<DataSource> {
        Arc::new(DataSource::Mock(MockSource::with_seed(DisplaySettings::default(), 5)))
    }

    #[test]
    fn overview_fills_missing_blocks() {
        let json = r#"{"cpuUsage": 30, "memoryUsage": 50, "diskUsage": 50, "gpuTemperature": 52}"#;
        let metrics: MetricsSnapshot = serde_json::from_str(json).unwrap();
        let benchmarks = MockSource::with_seed(DisplaySettings::default(), 1).benchmarks();

        let overview = SystemOverview::new(metrics, benchmarks, &DisplaySettings::default());

        let disk = overview.disk_space().unwrap();
        assert_eq!(disk.total, "512GB");
        assert_eq!(disk.used, "256GB");
        assert_eq!(disk.free, "256GB");
        assert_eq!(overview.gpu().unwrap().temperature, 52.0);
        let model = overview.model().unwrap();
        assert_eq!(model.name, "june13525");
        assert_eq!(model.context_window, 32_768);
    }

    #[test]
    fn overview_keeps_source_blocks() {
        let source = MockSource::with_seed(DisplaySettings::default(), 2);
        let metrics = source.metrics();
        let gpu = metrics.gpu_info.clone();
        let overview = SystemOverview::new(metrics, source.benchmarks(), &DisplaySettings::default());
        assert_eq!(overview.gpu().cloned(), gpu);
    }

    #[tokio::test]
    async fn loaders_join_every_operation() {
        let source = mock_source();
        let page = load_benchmark_page(&source).await.unwrap();
        assert_eq!(page.snapshot.comparison.len(), 5);
        assert_eq!(page.performance.test_categories.len(), 5);
        assert_eq!(page.trend.daily_comparisons.len(), 3);

        let overview = load_system_overview(&source, &DisplaySettings::default()).await.unwrap();
        assert!(overview.disk_space().is_some());

        match source.as_ref() {
            DataSource::Mock(mock) => assert_eq!(mock.call_count(), 5),
            DataSource::Live(_) => unreachable!(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dashboard_polls_each_panel_on_its_interval() {
        let source = mock_source();
        let dashboard = Dashboard::start(source.clone(), Arc::new(DashboardConfig::default()));

        tokio::time::sleep(Duration::from_secs(12)).await;
        dashboard.stop();

        let issued: Vec<u64> = dashboard.handles().iter().map(|h| h.issued()).collect();
        // metrics 5s, system 5s, benchmarks 30s, model status 10s, health 60s
        assert_eq!(issued, vec![3, 3, 1, 2, 1]);

        assert!(dashboard.metrics.current().is_ready());
        assert!(dashboard.system.current().is_ready());
        assert!(dashboard.benchmarks.current().is_ready());
        assert!(dashboard.model_status.current().value().unwrap().is_loaded());
        assert!(dashboard.health.current().value().unwrap().is_healthy());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_all_reissues_every_panel() {
        let dashboard = Dashboard::start(mock_source(), Arc::new(DashboardConfig::default()));
        tokio::time::sleep(Duration::from_millis(100)).await;

        dashboard.refresh_all();
        let issued: Vec<u64> = dashboard.handles().iter().map(|h| h.issued()).collect();
        assert_eq!(issued, vec![2, 2, 2, 2, 2]);

        dashboard.stop();
        assert!(dashboard.handles().iter().all(|h| !h.is_active()));
    }
}
