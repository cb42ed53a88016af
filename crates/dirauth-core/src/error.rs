//! Error types for directory credential verification.
//!
//! Errors classify how a verification attempt failed; they are forwarded to
//! the caller unchanged — this crate never retries or masks a failure. The
//! caller-facing mapping deliberately collapses every kind onto one of two
//! generic messages so that directory error codes never reach a client.

use serde::Serialize;
use thiserror::Error;

/// Main error type for directory verification operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Transport-level failure reaching the directory (refused, unreachable,
    /// network error).
    #[error("directory connection failed: {0}")]
    ConnectionError(String),

    /// The directory explicitly refused a bind.
    #[error("directory rejected bind: {0}")]
    BindRejected(String),

    /// No response within the configured time budget.
    #[error("directory operation timed out: {0}")]
    Timeout(String),

    /// A failure raised during the pre-flight connectivity check, before any
    /// credential bind was attempted.
    #[error("connectivity check failed: {0}")]
    ConnectivityCheckFailed(Box<Error>),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The directory endpoint URL is invalid.
    #[error("invalid directory endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for directory verification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
    /// Optional request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Error {
    /// Wraps this error as a pre-flight connectivity failure.
    #[must_use]
    pub fn into_connectivity_failure(self) -> Self {
        Self::ConnectivityCheckFailed(Box::new(self))
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionError(_) => "CONNECTION_ERROR",
            Self::BindRejected(_) => "BIND_REJECTED",
            Self::Timeout(_) => "TIMEOUT",
            Self::ConnectivityCheckFailed(_) => "CONNECTIVITY_CHECK_FAILED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns the generic message shown to an end user for this error.
    ///
    /// Only a rejected bind maps to the bad-credential message; every other
    /// kind reads as a transient login failure. Transport detail, timeout
    /// classification, and directory result codes are never surfaced.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::BindRejected(_) => "Invalid email or password",
            _ => "Login failed, please try again",
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Converts the error into an `ErrorResponse` with a request ID.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: None,
            },
            request_id,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    ///
    /// A rejected bind is an expected outcome (wrong password), not an
    /// operational problem.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        !matches!(self, Self::BindRejected(_))
    }
}

// Conversions from external error types
impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ConnectionError("test".to_string()).error_code(),
            "CONNECTION_ERROR"
        );
        assert_eq!(
            Error::BindRejected("test".to_string()).error_code(),
            "BIND_REJECTED"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ConnectionError("test".to_string())
                .into_connectivity_failure()
                .error_code(),
            "CONNECTIVITY_CHECK_FAILED"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::ConnectionError("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "directory connection failed: connection refused"
        );

        let wrapped = err.into_connectivity_failure();
        assert_eq!(
            wrapped.to_string(),
            "connectivity check failed: directory connection failed: connection refused"
        );
    }

    #[test]
    fn test_connectivity_failure_preserves_cause() {
        let err = Error::Timeout("no response".to_string()).into_connectivity_failure();
        match err {
            Error::ConnectivityCheckFailed(cause) => {
                assert_eq!(*cause, Error::Timeout("no response".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_user_messages_stay_generic() {
        assert_eq!(
            Error::BindRejected("rc 49".to_string()).user_message(),
            "Invalid email or password"
        );
        for err in [
            Error::ConnectionError("refused".to_string()),
            Error::Timeout("deadline".to_string()),
            Error::ConnectionError("refused".to_string()).into_connectivity_failure(),
            Error::ConfigError("bad".to_string()),
        ] {
            assert_eq!(err.user_message(), "Login failed, please try again");
            assert!(!err.user_message().contains("rc"));
        }
    }

    #[test]
    fn test_into_error_response() {
        let err = Error::Timeout("bind timed out".to_string());
        let response = err.clone().into_error_response();

        assert_eq!(response.error.code, "TIMEOUT");
        assert_eq!(
            response.error.message,
            "directory operation timed out: bind timed out"
        );
        assert!(response.request_id.is_none());

        let response_with_id = err.into_error_response_with_id(Some("req-456".to_string()));
        assert_eq!(response_with_id.request_id, Some("req-456".to_string()));
    }

    #[test]
    fn test_should_log() {
        assert!(Error::ConnectionError("test".to_string()).should_log());
        assert!(Error::Timeout("test".to_string()).should_log());
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::ConnectionError("test".to_string())
            .into_connectivity_failure()
            .should_log());

        assert!(!Error::BindRejected("test".to_string()).should_log());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let dir_err: Error = err.into();
        assert!(matches!(dir_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            error: ErrorDetail {
                code: "TEST_ERROR".to_string(),
                message: "Test message".to_string(),
                details: None,
            },
            request_id: Some("req-123".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("TEST_ERROR"));
        assert!(json.contains("Test message"));
        assert!(json.contains("req-123"));
    }

    #[test]
    fn test_error_response_serialization_no_request_id() {
        let response = ErrorResponse {
            error: ErrorDetail {
                code: "TEST_ERROR".to_string(),
                message: "Test message".to_string(),
                details: None,
            },
            request_id: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("request_id"));
    }

    #[test]
    fn test_error_clone_and_eq() {
        let err1 = Error::BindRejected("test".to_string());
        let err2 = err1.clone();
        let err3 = Error::BindRejected("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
