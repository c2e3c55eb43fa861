//! Error types for the RimWorld GM bridge

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for RimWorld GM operations
pub type Result<T> = std::result::Result<T, GmError>;

/// RimWorld GM error types
#[derive(Debug, Error)]
pub enum GmError {
    /// Remote endpoint refused or never accepted the connection
    #[error("could not connect to {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// Remote did not answer within the configured timeout
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    /// Any other transport failure (bad URL, reset mid-body, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Tool arguments did not match the expected shape
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Local server failed to bind or serve
    #[error("Server error: {0}")]
    ServerError(String),
}

impl GmError {
    /// Where this failure sits in the error taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            GmError::Unreachable { .. } => ErrorCategory::ConnectionUnavailable,
            _ => ErrorCategory::Unexpected,
        }
    }
}

impl From<serde_json::Error> for GmError {
    fn from(err: serde_json::Error) -> Self {
        GmError::SerializationError(err.to_string())
    }
}

/// Coarse classification of every failure a caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Remote process is not listening
    ConnectionUnavailable,
    /// Remote rejected a malformed request
    Validation,
    /// Remote reported a business-state failure
    Domain,
    /// Timeouts, malformed JSON, internal faults
    Unexpected,
}

/// Structured error codes returned by the remote HTTP API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    InvalidRequest,
    InvalidEvent,
    ModNotReady,
    NoColonyLoaded,
    NotFound,
    Unauthorized,
    RateLimited,
    CooldownActive,
    EventFailed,
    EventBlocked,
    GameNotRunning,
    InternalError,
    #[serde(other)]
    Unknown,
}

impl ApiErrorCode {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            ApiErrorCode::InvalidRequest => "INVALID_REQUEST",
            ApiErrorCode::InvalidEvent => "INVALID_EVENT",
            ApiErrorCode::ModNotReady => "MOD_NOT_READY",
            ApiErrorCode::NoColonyLoaded => "NO_COLONY_LOADED",
            ApiErrorCode::NotFound => "NOT_FOUND",
            ApiErrorCode::Unauthorized => "UNAUTHORIZED",
            ApiErrorCode::RateLimited => "RATE_LIMITED",
            ApiErrorCode::CooldownActive => "COOLDOWN_ACTIVE",
            ApiErrorCode::EventFailed => "EVENT_FAILED",
            ApiErrorCode::EventBlocked => "EVENT_BLOCKED",
            ApiErrorCode::GameNotRunning => "GAME_NOT_RUNNING",
            ApiErrorCode::InternalError => "INTERNAL_ERROR",
            ApiErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// HTTP status the remote pairs with this code
    pub fn status(self) -> u16 {
        match self {
            ApiErrorCode::InvalidRequest | ApiErrorCode::InvalidEvent => 400,
            ApiErrorCode::Unauthorized => 401,
            ApiErrorCode::NotFound => 404,
            ApiErrorCode::RateLimited | ApiErrorCode::CooldownActive => 429,
            ApiErrorCode::GameNotRunning | ApiErrorCode::ModNotReady => 503,
            ApiErrorCode::InternalError => 500,
            ApiErrorCode::NoColonyLoaded
            | ApiErrorCode::EventFailed
            | ApiErrorCode::EventBlocked
            | ApiErrorCode::Unknown => 409,
        }
    }

    pub fn category(self) -> ErrorCategory {
        match self {
            ApiErrorCode::InvalidRequest | ApiErrorCode::InvalidEvent => ErrorCategory::Validation,
            _ => ErrorCategory::Domain,
        }
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&ApiErrorCode::NoColonyLoaded).unwrap();
        assert_eq!(json, "\"NO_COLONY_LOADED\"");

        let code: ApiErrorCode = serde_json::from_str("\"INVALID_EVENT\"").unwrap();
        assert_eq!(code, ApiErrorCode::InvalidEvent);
    }

    #[test]
    fn test_unrecognized_code_is_unknown() {
        let code: ApiErrorCode = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(code, ApiErrorCode::Unknown);
        assert_eq!(code.category(), ErrorCategory::Domain);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiErrorCode::InvalidRequest.status(), 400);
        assert_eq!(ApiErrorCode::InvalidEvent.status(), 400);
        assert_eq!(ApiErrorCode::ModNotReady.status(), 503);
        assert_eq!(ApiErrorCode::NoColonyLoaded.status(), 409);
        assert_eq!(ApiErrorCode::NotFound.status(), 404);
        assert_eq!(ApiErrorCode::CooldownActive.status(), 429);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ApiErrorCode::InvalidEvent.category(), ErrorCategory::Validation);
        assert_eq!(ApiErrorCode::ModNotReady.category(), ErrorCategory::Domain);

        let unreachable = GmError::Unreachable {
            endpoint: "http://localhost:18800/state".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(unreachable.category(), ErrorCategory::ConnectionUnavailable);
        assert_eq!(
            GmError::Timeout {
                after: Duration::from_secs(5)
            }
            .category(),
            ErrorCategory::Unexpected
        );
    }

    #[test]
    fn test_sub_second_timeout_display() {
        let err = GmError::Timeout {
            after: Duration::from_millis(200),
        };
        assert_eq!(err.to_string(), "request timed out after 200ms");
    }
}
