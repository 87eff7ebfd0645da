//! Display snapshots exchanged with the backend.
//!
//! Every value here is a plain snapshot: produced by one fetch and replaced
//! wholesale by the next. Nothing is merged or kept as history.

mod benchmarks;
mod metrics;
mod model;
mod percentage;
mod settings;

pub use benchmarks::{
    benchmark_label, BenchmarkMeta, BenchmarkResults, BenchmarkSnapshot, BenchmarkTrend,
    ComparisonRow, DailyComparison, DisplayRow, PerformanceReport, TestCategory,
    KNOWN_BENCHMARKS,
};
pub use metrics::{DiskSpace, GpuInfo, MetricsSnapshot, ModelDescriptor, DEFAULT_DISK_TOTAL_GB};
pub use model::{
    Completion, CompletionRequest, HealthStatus, LoadAck, ModelInfo, ModelStatus,
};
pub use percentage::Percentage;
pub use settings::{
    snap, ModelVariant, SaveAck, SettingsState, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP,
    MEMORY_LIMIT_RANGE, MEMORY_LIMIT_STEP, THREAD_COUNT_RANGE,
};
