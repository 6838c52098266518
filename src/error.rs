//! Error types for Ruleflow.
//!
//! All errors in Ruleflow are represented by the `RuleflowError` enum.
//! Validation errors are raised before any request leaves the process,
//! everything coming back from the rule-engine service is mapped onto
//! `Transport`, `NotFound` or `Convert`.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Ruleflow operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum RuleflowError {
    /// The request could not be completed, or the backend answered with a
    /// non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Input rejected before any network call was issued.
    #[error("validation error: {0}")]
    Validation(String),

    /// The addressed rule no longer exists on the backend.
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload (de)serialization errors.
    #[error("{0}")]
    Convert(String),

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// A newer operation of the same kind started before this one resolved,
    /// so its response was discarded.
    #[error("superseded: {0}")]
    Superseded(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),

    /// Message queue errors.
    #[error("queue error: {0}")]
    Queue(String),
}

impl RuleflowError {
    /// Whether this error is worth showing to the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, RuleflowError::Superseded(_))
    }
}

impl From<RuleflowError> for String {
    fn from(val: RuleflowError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for RuleflowError {
    fn from(error: std::io::Error) -> Self {
        RuleflowError::IoError(error.to_string())
    }
}

impl From<RuleflowError> for std::io::Error {
    fn from(val: RuleflowError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for RuleflowError {
    fn from(error: serde_json::Error) -> Self {
        RuleflowError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for RuleflowError {
    fn from(error: toml::de::Error) -> Self {
        RuleflowError::Config(error.to_string())
    }
}

impl From<url::ParseError> for RuleflowError {
    fn from(error: url::ParseError) -> Self {
        RuleflowError::Config(format!("invalid url: {}", error))
    }
}

impl From<reqwest::Error> for RuleflowError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return RuleflowError::Convert(error.to_string());
        }
        match error.status() {
            Some(status) => RuleflowError::Transport(format!("http status {}: {}", status.as_u16(), error)),
            None => RuleflowError::Transport(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_is_not_user_visible() {
        assert!(!RuleflowError::Superseded("load".into()).is_user_visible());
        assert!(RuleflowError::Validation("rule name is required".into()).is_user_visible());
        assert!(RuleflowError::Transport("connection refused".into()).is_user_visible());
    }

    #[test]
    fn test_display() {
        let err = RuleflowError::NotFound("rule 7".into());
        assert_eq!(err.to_string(), "not found: rule 7");

        let err: RuleflowError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, RuleflowError::Convert(_)));
    }
}
