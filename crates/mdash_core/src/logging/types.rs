//! Logging types.

use serde::{Deserialize, Serialize};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace-level debugging (very verbose).
    Trace,
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl LogLevel {
    /// Filter directive string for `EnvFilter`.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// One step more verbose, saturating at `Trace`.
    pub fn more_verbose(self) -> Self {
        match self {
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_verbose_saturates() {
        assert_eq!(LogLevel::Info.more_verbose(), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.more_verbose(), LogLevel::Trace);
    }

    #[test]
    fn serializes_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            level: LogLevel,
        }

        let text = toml::to_string(&Wrapper { level: LogLevel::Warn }).unwrap();
        assert_eq!(text.trim(), "level = \"warn\"");
        let parsed: Wrapper = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(parsed.level, LogLevel::Debug);
    }
}
