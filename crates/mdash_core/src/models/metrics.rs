//! Live system metrics snapshot.

use serde::{Deserialize, Serialize};

/// Disk size assumed when only a usage percentage is known.
pub const DEFAULT_DISK_TOTAL_GB: u32 = 512;

/// One poll's worth of system metrics. Replaced wholesale on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Backend status label ("operational", "degraded", ...).
    #[serde(default = "default_status")]
    pub status: String,
    /// CPU usage percentage.
    pub cpu_usage: f64,
    /// Memory usage percentage.
    pub memory_usage: f64,
    /// Disk usage percentage.
    #[serde(default)]
    pub disk_usage: f64,
    /// GPU temperature in degrees Celsius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_temperature: Option<f64>,
    /// Seconds since the backend started.
    #[serde(default, rename = "uptime")]
    pub uptime_secs: u64,
    /// Requests per second.
    #[serde(default)]
    pub request_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_space: Option<DiskSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_info: Option<GpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelDescriptor>,
}

fn default_status() -> String {
    "operational".to_string()
}

impl MetricsSnapshot {
    /// GPU temperature from the top-level field or the GPU block.
    pub fn effective_gpu_temperature(&self) -> Option<f64> {
        self.gpu_temperature
            .or_else(|| self.gpu_info.as_ref().map(|gpu| gpu.temperature))
    }
}

/// Disk capacity as display strings ("512GB").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSpace {
    pub total: String,
    pub used: String,
    pub free: String,
}

impl DiskSpace {
    /// Derive used/free strings from a usage percentage of `total_gb`.
    pub fn from_usage(total_gb: u32, usage_pct: f64) -> Self {
        let pct = usage_pct.clamp(0.0, 100.0);
        let total = f64::from(total_gb);
        Self {
            total: format!("{}GB", total_gb),
            used: format!("{}GB", (pct * total / 100.0).round() as u64),
            free: format!("{}GB", ((100.0 - pct) * total / 100.0).round() as u64),
        }
    }

    /// Used fraction (0.0-1.0), if both sizes parse.
    pub fn used_fraction(&self) -> Option<f64> {
        let used = parse_gb(&self.used)?;
        let total = parse_gb(&self.total)?;
        (total > 0.0).then(|| (used / total).clamp(0.0, 1.0))
    }
}

fn parse_gb(text: &str) -> Option<f64> {
    text.trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim()
        .parse()
        .ok()
}

/// GPU details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub name: String,
    pub memory_total: String,
    pub temperature: f64,
}

/// Model description shown next to the metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    pub version: String,
    pub context_window: u32,
    pub parameters: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_space_from_usage_rounds() {
        let disk = DiskSpace::from_usage(512, 25.0);
        assert_eq!(disk.total, "512GB");
        assert_eq!(disk.used, "128GB");
        assert_eq!(disk.free, "384GB");
        assert_eq!(disk.used_fraction(), Some(0.25));
    }

    #[test]
    fn decodes_minimal_payload() {
        let json = r#"{"cpuUsage": 42, "memoryUsage": 61.5}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.status, "operational");
        assert_eq!(snapshot.cpu_usage, 42.0);
        assert_eq!(snapshot.disk_usage, 0.0);
        assert!(snapshot.effective_gpu_temperature().is_none());
    }

    #[test]
    fn gpu_temperature_falls_back_to_gpu_block() {
        let json = r#"{
            "cpuUsage": 10, "memoryUsage": 20, "uptime": 3600,
            "gpuInfo": {"name": "NVIDIA RTX 4090", "memoryTotal": "24GB", "temperature": 55}
        }"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.uptime_secs, 3600);
        assert_eq!(snapshot.effective_gpu_temperature(), Some(55.0));
    }
}
