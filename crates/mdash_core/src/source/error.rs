//! Data source errors.

use thiserror::Error;

/// Errors a data operation can fail with.
///
/// Only the live source produces these (apart from request validation);
/// mock operations never fail.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("{path} returned HTTP {status}")]
    Status { status: u16, path: String },

    #[error("Unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for data operations.
pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Classify a `reqwest` failure for `path`.
    pub fn from_reqwest(path: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Decode {
                path: path.to_string(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            }
        } else {
            SourceError::Transport(err.to_string())
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Transport(_) | SourceError::Timeout => true,
            SourceError::Status { status, .. } => *status >= 500 || *status == 429,
            SourceError::Decode { .. } | SourceError::InvalidRequest(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = SourceError::Status {
            status: 500,
            path: "/system/metrics".to_string(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "/system/metrics returned HTTP 500");

        let err = SourceError::Status {
            status: 404,
            path: "/system/metrics".to_string(),
        };
        assert!(!err.is_retryable());
    }
}
