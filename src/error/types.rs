//! Error type definitions
//!
//! Defines the main error types used throughout the fusia client.

use thiserror::Error;

use crate::validate::CommentRule;

/// Main error type for the fusia client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The embedded shared-data blob could not be located or parsed.
    ///
    /// Fatal for session bootstrap: without it no CSRF token can be
    /// established.
    #[error("Shared data parse error: {0}")]
    ConfigParse(String),

    /// The server declined the submitted credentials.
    ///
    /// Carries the server reply so callers can log it and retry with
    /// different credentials.
    #[error("Authentication rejected by server")]
    AuthRejected {
        /// Raw JSON payload returned by the login endpoint
        payload: serde_json::Value,
    },

    /// Unexpected HTTP status on a call that did not tolerate redirects
    #[error("HTTP status error: {0}")]
    HttpStatus(u16),

    /// Envelope or result-path validation failed on a query response.
    ///
    /// The upstream API reports both envelope-status failures and missing
    /// result paths uniformly as "not found"; that coarse taxonomy is kept.
    #[error("404 Not Found")]
    NotFound,

    /// A client-side input rule was violated before any network call
    #[error("Validation error: {rule}")]
    Validation {
        /// The violated rule
        rule: CommentRule,
    },

    /// Session state errors (e.g. logout while anonymous)
    #[error("Session error: {0}")]
    Session(String),

    /// Cookie store load/save errors
    #[error("Cookie store error: {0}")]
    CookieStore(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new shared-data parse error
    pub fn config_parse(msg: impl Into<String>) -> Self {
        Self::ConfigParse(msg.into())
    }

    /// Create a new session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a new cookie store error
    pub fn cookie_store(msg: impl Into<String>) -> Self {
        Self::CookieStore(msg.into())
    }

    /// Create a validation error for the given rule
    pub fn validation(rule: CommentRule) -> Self {
        Self::Validation { rule }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test config error");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_config_parse_error() {
        let err = Error::config_parse("marker not found");
        assert!(matches!(err, Error::ConfigParse(_)));
        assert!(err.to_string().contains("Shared data parse error"));
    }

    #[test]
    fn test_auth_rejected_carries_payload() {
        let payload = serde_json::json!({"authenticated": false, "user": true});
        let err = Error::AuthRejected {
            payload: payload.clone(),
        };
        match err {
            Error::AuthRejected { payload: p } => assert_eq!(p, payload),
            _ => panic!("expected AuthRejected"),
        }
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(Error::NotFound.to_string(), "404 Not Found");
    }

    #[test]
    fn test_validation_error_names_rule() {
        let err = Error::validation(CommentRule::Hashtags);
        assert!(err.to_string().contains("hashtags"));
    }
}
