//! In-process mock data matrix.
//!
//! Values are static literals or randomized within fixed ranges. Nothing
//! here performs I/O and no operation can fail.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::DisplaySettings;
use crate::models::{
    BenchmarkMeta, BenchmarkResults, BenchmarkSnapshot, BenchmarkTrend, ComparisonRow,
    Completion, CompletionRequest, DailyComparison, DiskSpace, GpuInfo, HealthStatus, LoadAck,
    MetricsSnapshot, ModelDescriptor, ModelInfo, ModelStatus, Percentage, PerformanceReport,
    SaveAck, SettingsState, TestCategory, DEFAULT_DISK_TOTAL_GB,
};

/// CPU usage range, percent.
pub const CPU_USAGE_RANGE: Range<u32> = 10..70;
/// Memory usage range, percent.
pub const MEMORY_USAGE_RANGE: Range<u32> = 20..90;
/// GPU temperature range, degrees Celsius.
pub const GPU_TEMPERATURE_RANGE: Range<u32> = 40..70;
/// Request rate range, requests per second.
pub const REQUEST_RATE_RANGE: Range<u32> = 20..120;

const DISK_USAGE_PCT: f64 = 25.0;
const CONTEXT_WINDOW: u32 = 32_768;
const PARAMETERS: &str = "175B";
const BUILD_VERSION: &str = "1.0.0";
const BUILD_DATE: &str = "2025-06-13";

/// Self scores, in `KNOWN_BENCHMARKS` order.
const SELF_SCORES: [f64; 4] = [98.7, 99.2, 92.5, 97.8];

const COMPETITORS: [(&str, [f64; 4]); 4] = [
    ("GPT-4o", [89.3, 87.2, 85.8, 92.0]),
    ("Claude 3 Opus", [86.5, 85.9, 82.1, 94.2]),
    ("Gemini 1.5 Pro", [84.2, 83.1, 80.9, 90.5]),
    ("CodeLlama", [67.8, 65.3, 58.5, 52.7]),
];

const PERFORMANCE_STATS: [(&str, &str); 4] = [
    ("Speed", "+348%"),
    ("Accuracy", "+263%"),
    ("ContextHandling", "+512%"),
    ("ReasoningCapability", "+427%"),
];

const TEST_CATEGORIES: [(&str, f64, &str); 5] = [
    ("Code Generation", 98.7, "Ability to generate correct, efficient, and optimized code from prompts"),
    ("Code Understanding", 97.9, "Comprehension of complex code structures and algorithms"),
    ("Problem Solving", 96.8, "Ability to solve complex programming challenges"),
    ("Reasoning", 97.5, "Logical reasoning and inference capabilities"),
    ("Context Awareness", 99.3, "Maintaining context and applying relevant knowledge"),
];

const VERIFICATION_METHODS: [&str; 4] = [
    "Independent Lab Testing",
    "Peer-Reviewed Evaluation",
    "Industry Standard Benchmarks",
    "Real-world Performance Testing",
];

const TREND: [(&str, f64, f64); 3] = [
    ("2025-06-01", 98.2, 88.5),
    ("2025-06-07", 98.5, 88.7),
    ("2025-06-13", 98.7, 89.2),
];

/// Mock data source.
pub struct MockSource {
    display: DisplaySettings,
    started: Instant,
    rng: Mutex<StdRng>,
    /// Settings saved during this session.
    settings: Mutex<SettingsState>,
    model_status: Mutex<ModelStatus>,
    calls: AtomicU64,
}

impl MockSource {
    /// Create a mock source with an entropy-seeded generator.
    pub fn new(display: DisplaySettings) -> Self {
        Self::with_rng(display, StdRng::from_entropy())
    }

    /// Create a mock source with a fixed seed (reproducible values).
    pub fn with_seed(display: DisplaySettings, seed: u64) -> Self {
        Self::with_rng(display, StdRng::seed_from_u64(seed))
    }

    fn with_rng(display: DisplaySettings, rng: StdRng) -> Self {
        let settings = SettingsState {
            model_variant: display.model_version.parse().unwrap_or_default(),
            version: Some(BUILD_VERSION.to_string()),
            build_date: Some(BUILD_DATE.to_string()),
            ..SettingsState::default()
        };

        Self {
            display,
            started: Instant::now(),
            rng: Mutex::new(rng),
            settings: Mutex::new(settings),
            model_status: Mutex::new(ModelStatus::Loaded),
            calls: AtomicU64::new(0),
        }
    }

    /// Number of operations served so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn record(&self, operation: &str) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        debug!(operation, "Serving mock data");
    }

    fn sample(&self, range: Range<u32>) -> f64 {
        f64::from(self.rng.lock().gen_range(range))
    }

    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            name: self.display.model_name.clone(),
            version: self.display.model_version.clone(),
            context_window: CONTEXT_WINDOW,
            parameters: PARAMETERS.to_string(),
        }
    }

    pub fn health(&self) -> HealthStatus {
        self.record("get health");
        HealthStatus {
            status: "ok".to_string(),
            version: Some(BUILD_VERSION.to_string()),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.record("get metrics");
        let temperature = self.sample(GPU_TEMPERATURE_RANGE);
        MetricsSnapshot {
            status: "operational".to_string(),
            cpu_usage: self.sample(CPU_USAGE_RANGE),
            memory_usage: self.sample(MEMORY_USAGE_RANGE),
            disk_usage: DISK_USAGE_PCT,
            gpu_temperature: Some(temperature),
            uptime_secs: self.started.elapsed().as_secs(),
            request_rate: self.sample(REQUEST_RATE_RANGE),
            disk_space: Some(DiskSpace::from_usage(DEFAULT_DISK_TOTAL_GB, DISK_USAGE_PCT)),
            gpu_info: Some(GpuInfo {
                name: "NVIDIA RTX 4090".to_string(),
                memory_total: "24GB".to_string(),
                temperature,
            }),
            model_info: Some(self.descriptor()),
        }
    }

    pub fn settings(&self) -> SettingsState {
        self.record("get settings");
        self.settings.lock().clone()
    }

    /// Accept new settings for the rest of the session.
    pub fn update_settings(&self, settings: &SettingsState) -> SaveAck {
        self.record("update settings");
        let mut current = self.settings.lock();
        *current = SettingsState {
            version: current.version.clone(),
            build_date: current.build_date.clone(),
            ..settings.normalized()
        };
        SaveAck { success: true }
    }

    pub fn model_info(&self) -> ModelInfo {
        self.record("get model info");
        ModelInfo {
            name: self.display.model_name.clone(),
            version: self.display.model_version.clone(),
            status: *self.model_status.lock(),
            context_window: CONTEXT_WINDOW,
            parameters: PARAMETERS.to_string(),
        }
    }

    pub fn load_model(&self, model_id: &str) -> LoadAck {
        self.record("load model");
        let mut status = self.model_status.lock();
        let message = if *status == ModelStatus::Loaded {
            format!("{} is already loaded", model_id)
        } else {
            *status = ModelStatus::Loaded;
            format!("{} loaded", model_id)
        };
        LoadAck {
            success: true,
            message: Some(message),
        }
    }

    pub fn benchmarks(&self) -> BenchmarkSnapshot {
        self.record("get benchmarks");
        let mut comparison = vec![ComparisonRow {
            model: self.display.model_name.clone(),
            scores: score_map(&SELF_SCORES),
        }];
        comparison.extend(COMPETITORS.iter().map(|(model, scores)| ComparisonRow {
            model: model.to_string(),
            scores: score_map(scores),
        }));

        BenchmarkSnapshot {
            results: BenchmarkResults {
                last_updated: Some(BUILD_DATE.to_string()),
                verified: Some(true),
                scores: score_map(&SELF_SCORES),
            },
            comparison,
            meta: Some(BenchmarkMeta {
                name: Some(format!("{} Benchmark Suite", self.display.model_name)),
                test_count: 7832,
                hardware: Some("NVIDIA A100 80GB GPUs".to_string()),
                environment: Some("Controlled testing environment".to_string()),
            }),
        }
    }

    pub fn performance_stats(&self) -> PerformanceReport {
        self.record("get performance stats");
        PerformanceReport {
            performance_stats: PERFORMANCE_STATS
                .iter()
                .map(|(name, delta)| (name.to_string(), delta.to_string()))
                .collect(),
            test_categories: TEST_CATEGORIES
                .iter()
                .map(|(name, score, description)| TestCategory {
                    name: name.to_string(),
                    score: Percentage(*score),
                    description: description.to_string(),
                })
                .collect(),
            verification_methods: VERIFICATION_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn benchmark_trend(&self) -> BenchmarkTrend {
        self.record("get benchmark trend");
        BenchmarkTrend {
            daily_comparisons: TREND
                .iter()
                .map(|(date, own, competitor)| DailyComparison {
                    date: date.to_string(),
                    series: BTreeMap::from([
                        (self.display.model_name.clone(), Percentage(*own)),
                        ("competitor".to_string(), Percentage(*competitor)),
                    ]),
                })
                .collect(),
            improvement_trend: "+9.5% average improvement".to_string(),
        }
    }

    pub fn generate_completion(&self, request: &CompletionRequest) -> Completion {
        self.record("generate completion");
        let first_line = request.prompt.lines().next().unwrap_or_default().trim();
        Completion {
            completion: format!(
                "// {} {} (temperature {:.2})\n// Prompt: {}\n\nfunction solve(input) {{\n  return input;\n}}\n",
                self.display.model_name, self.display.model_version, request.temperature, first_line
            ),
        }
    }
}

fn score_map(scores: &[f64; 4]) -> BTreeMap<String, Percentage> {
    crate::models::KNOWN_BENCHMARKS
        .iter()
        .zip(scores.iter())
        .map(|(name, score)| (name.to_string(), Percentage(*score)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelVariant;

    fn source() -> MockSource {
        MockSource::with_seed(DisplaySettings::default(), 7)
    }

    #[test]
    fn metrics_stay_in_ranges() {
        let source = source();
        for _ in 0..200 {
            let metrics = source.metrics();
            assert!((10.0..70.0).contains(&metrics.cpu_usage));
            assert!((20.0..90.0).contains(&metrics.memory_usage));
            let temperature = metrics.effective_gpu_temperature().unwrap();
            assert!((40.0..70.0).contains(&temperature));
            assert!((20.0..120.0).contains(&metrics.request_rate));
            assert_eq!(metrics.disk_space.unwrap().used, "128GB");
        }
        assert_eq!(source.call_count(), 200);
    }

    #[test]
    fn benchmarks_have_self_row_plus_four_competitors() {
        let snapshot = source().benchmarks();
        assert_eq!(snapshot.comparison.len(), 5);
        assert_eq!(snapshot.comparison[0].model, "june13525");
        assert_eq!(snapshot.results.scores["humaneval"], Percentage(98.7));
        assert_eq!(snapshot.metric_names(), vec!["humaneval", "mbpp", "codecontests", "gsm8k"]);
    }

    #[test]
    fn saved_settings_persist_for_session() {
        let source = source();
        let mut settings = source.settings();
        assert_eq!(settings.build_date.as_deref(), Some("2025-06-13"));

        settings.model_variant = ModelVariant::Ultra;
        settings.thread_count = 99;
        settings.build_date = None;
        assert!(source.update_settings(&settings).success);

        let reloaded = source.settings();
        assert_eq!(reloaded.model_variant, ModelVariant::Ultra);
        assert_eq!(reloaded.thread_count, 32);
        assert_eq!(reloaded.build_date.as_deref(), Some("2025-06-13"));
    }

    #[test]
    fn trend_uses_configured_model_name() {
        let display = DisplaySettings {
            model_name: "june-x".to_string(),
            ..DisplaySettings::default()
        };
        let trend = MockSource::with_seed(display, 1).benchmark_trend();
        assert_eq!(trend.daily_comparisons.len(), 3);
        assert!(trend.daily_comparisons[0].series.contains_key("june-x"));
    }

    #[test]
    fn completion_echoes_prompt() {
        let request = CompletionRequest::new("reverse a list\nin place").unwrap();
        let completion = source().generate_completion(&request);
        assert!(completion.completion.contains("Prompt: reverse a list"));
    }
}
