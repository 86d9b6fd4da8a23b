//! Error types shared across ports, configuration, and workflows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a remote service call.
///
/// The variants keep the two conditions the workflows branch on
/// (`Conflict` and `NotFound`) apart from every other failure. The type
/// serializes so that recorded cassettes can replay the exact variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RemoteError {
    /// The resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service rejected the call for any other reason.
    #[error("{code}: {message}")]
    Service {
        /// Service error code (e.g. `ValidationException`).
        code: String,
        /// Human-readable message from the service.
        message: String,
    },

    /// The call never produced a service response (network, credentials, ...).
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Shorthand for a `Service` error.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service { code: code.into(), message: message.into() }
    }

    /// Returns `true` for the "already exists" condition.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns `true` for the "does not exist" condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised while loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for the config schema.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The file parsed but describes an invalid desired state.
    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_round_trips_through_json() {
        let err = RemoteError::Conflict("contact lmhung".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "conflict");
        let back: RemoteError = serde_json::from_value(json).unwrap();
        assert!(back.is_conflict());
    }

    #[test]
    fn service_error_displays_code_and_message() {
        let err = RemoteError::service("ValidationException", "bad alias");
        assert_eq!(err.to_string(), "ValidationException: bad alias");
        assert!(!err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalid_config_lists_every_problem() {
        let err = ConfigError::Invalid(vec!["one".into(), "two".into()]);
        let text = err.to_string();
        assert!(text.contains("- one"));
        assert!(text.contains("- two"));
    }
}
