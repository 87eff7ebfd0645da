//! Display-only model settings edited from the settings panel.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Allowed context length, in tokens.
pub const CONTEXT_LENGTH_RANGE: RangeInclusive<u32> = 8_192..=32_768;
/// Context length slider step.
pub const CONTEXT_LENGTH_STEP: u32 = 1_024;
/// Allowed memory limit, in GB.
pub const MEMORY_LIMIT_RANGE: RangeInclusive<u32> = 16..=128;
/// Memory limit slider step.
pub const MEMORY_LIMIT_STEP: u32 = 16;
/// Allowed worker thread count.
pub const THREAD_COUNT_RANGE: RangeInclusive<u32> = 1..=32;

/// Model edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelVariant {
    #[default]
    Standard,
    Pro,
    Ultra,
    Benchmark,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 4] = [
        ModelVariant::Standard,
        ModelVariant::Pro,
        ModelVariant::Ultra,
        ModelVariant::Benchmark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Standard => "Standard",
            ModelVariant::Pro => "Pro",
            ModelVariant::Ultra => "Ultra",
            ModelVariant::Benchmark => "Benchmark",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown model variant '{}' (expected one of: Standard, Pro, Ultra, Benchmark)",
                    s
                )
            })
    }
}

/// Settings as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsState {
    #[serde(rename = "modelVersion", default)]
    pub model_variant: ModelVariant,
    #[serde(rename = "contextLength", default = "default_context_length")]
    pub context_length: u32,
    #[serde(rename = "memoryLimit", default = "default_memory_limit")]
    pub memory_limit_gb: u32,
    #[serde(rename = "threads", default = "default_thread_count")]
    pub thread_count: u32,
    /// Backend build version (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Backend build date (read-only).
    #[serde(rename = "buildDate", default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
}

fn default_context_length() -> u32 {
    32_768
}

fn default_memory_limit() -> u32 {
    128
}

fn default_thread_count() -> u32 {
    8
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            model_variant: ModelVariant::default(),
            context_length: default_context_length(),
            memory_limit_gb: default_memory_limit(),
            thread_count: default_thread_count(),
            version: None,
            build_date: None,
        }
    }
}

impl SettingsState {
    /// Copy with every numeric field snapped into its slider range.
    pub fn normalized(&self) -> Self {
        Self {
            context_length: snap(self.context_length, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP),
            memory_limit_gb: snap(self.memory_limit_gb, MEMORY_LIMIT_RANGE, MEMORY_LIMIT_STEP),
            thread_count: snap(self.thread_count, THREAD_COUNT_RANGE, 1),
            ..self.clone()
        }
    }
}

/// Clamp into `range` and round to the nearest multiple of `step` from its start.
pub fn snap(value: u32, range: RangeInclusive<u32>, step: u32) -> u32 {
    let (lo, hi) = (*range.start(), *range.end());
    let clamped = value.clamp(lo, hi);
    if step <= 1 {
        return clamped;
    }
    let offset = clamped - lo;
    let snapped = lo + ((offset + step / 2) / step) * step;
    snapped.min(hi)
}

/// Acknowledgement for a settings save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAck {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_clamps_and_rounds() {
        assert_eq!(snap(4_096, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP), 8_192);
        assert_eq!(snap(10_000, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP), 10_240);
        assert_eq!(snap(99_999, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP), 32_768);
        assert_eq!(snap(40, MEMORY_LIMIT_RANGE, MEMORY_LIMIT_STEP), 48);
        assert_eq!(snap(0, THREAD_COUNT_RANGE, 1), 1);
    }

    #[test]
    fn wire_names_match_backend() {
        let json = serde_json::to_value(SettingsState::default()).unwrap();
        assert_eq!(json["modelVersion"], "Standard");
        assert_eq!(json["contextLength"], 32_768);
        assert_eq!(json["memoryLimit"], 128);
        assert_eq!(json["threads"], 8);
        assert!(json.get("buildDate").is_none());
    }

    #[test]
    fn decodes_backend_payload() {
        let json = r#"{"modelVersion": "Ultra", "contextLength": 16384, "memoryLimit": 64,
                       "threads": 12, "version": "1.0.0", "buildDate": "2025-06-13"}"#;
        let settings: SettingsState = serde_json::from_str(json).unwrap();
        assert_eq!(settings.model_variant, ModelVariant::Ultra);
        assert_eq!(settings.thread_count, 12);
        assert_eq!(settings.build_date.as_deref(), Some("2025-06-13"));
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("pro".parse::<ModelVariant>(), Ok(ModelVariant::Pro));
        assert!("Mega".parse::<ModelVariant>().is_err());
    }
}
