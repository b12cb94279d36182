//! Error types for Just In Case.

use reqwest::StatusCode;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Checklist construction errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("Checklist has no topics")]
    Empty,

    #[error("Duplicate topic key: {0}")]
    DuplicateKey(String),
}

/// Errors talking to the assistant backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: StatusCode,
        message: String,
    },

    #[error("Server returned non-JSON from {endpoint}: {body}")]
    NotJson { endpoint: String, body: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// Terminal channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_error_names_the_key() {
        let err = ChecklistError::DuplicateKey("water".into());
        assert_eq!(err.to_string(), "Duplicate topic key: water");
    }

    #[test]
    fn channel_error_keeps_io_source() {
        use std::error::Error as _;

        let err = ChannelError::Output(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(err.to_string().starts_with("Failed to write output"));
        assert!(err.source().is_some());
    }

    #[test]
    fn status_error_includes_server_message() {
        let err = BackendError::Status {
            endpoint: "/query".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "index not ready".into(),
        };
        let text = err.to_string();
        assert!(text.contains("/query"));
        assert!(text.contains("500"));
        assert!(text.contains("index not ready"));
    }
}
