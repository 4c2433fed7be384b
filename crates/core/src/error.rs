//! Error types for the Localfind CLI.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application. The taxonomy matters: the retry and fallback layers
//! key off it. Only `Overloaded` is ever retried with backoff, `Malformed`
//! gets a bounded number of same-request retries, and `SafetyBlocked` is
//! surfaced to the user as-is.

use thiserror::Error;

/// Unified error type for the Localfind CLI.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transient overload/unavailability from the model endpoint.
    /// The only retryable error class.
    #[error("The model is currently overloaded: {0}")]
    Overloaded(String),

    /// The response was blocked by the endpoint's safety settings.
    /// Never retried; the user must modify the query.
    #[error("The response was blocked by safety settings: {0}")]
    SafetyBlocked(String),

    /// The model's text could not be normalized into business records.
    #[error("The model response was not in the expected format: {0}")]
    Malformed(String),

    /// Non-transient API errors (auth failures, bad requests, empty replies)
    #[error("API error: {0}")]
    Api(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error represents a transient endpoint overload.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, AppError::Overloaded(_))
    }

    /// Whether this error represents an unparseable model response.
    pub fn is_malformed(&self) -> bool {
        matches!(self, AppError::Malformed(_))
    }

    /// Whether this error represents a safety-filtered response.
    pub fn is_safety_blocked(&self) -> bool {
        matches!(self, AppError::SafetyBlocked(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_class_predicates() {
        let overloaded = AppError::Overloaded("503 Service Unavailable".to_string());
        assert!(overloaded.is_overloaded());
        assert!(!overloaded.is_malformed());

        let malformed = AppError::Malformed("not a list".to_string());
        assert!(malformed.is_malformed());
        assert!(!malformed.is_safety_blocked());

        let blocked = AppError::SafetyBlocked("SAFETY".to_string());
        assert!(blocked.is_safety_blocked());
        assert!(!blocked.is_overloaded());
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::Overloaded("try again later".to_string());
        assert!(err.to_string().contains("overloaded"));

        let err = AppError::SafetyBlocked("blocked".to_string());
        assert!(err.to_string().contains("safety settings"));
    }
}
