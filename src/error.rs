// src/error.rs
// Error types: normalized API failures and the crate-level error

use std::fmt;
use thiserror::Error;

/// Classification of a failed Early API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Credentials missing, rejected, or the sign-in itself failed authentication
    Unauthenticated,
    /// Remote 404
    NotFound,
    /// Any other non-2xx status
    RemoteStatus(u16),
    /// DNS, connection, TLS or timeout failure
    Transport,
    /// 2xx response whose body could not be understood
    InvalidResponse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::NotFound => write!(f, "not found"),
            Self::RemoteStatus(code) => write!(f, "remote status {}", code),
            Self::Transport => write!(f, "transport"),
            Self::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// Normalized error produced by the request dispatcher.
///
/// Handlers never see raw `reqwest` errors; everything that can go wrong
/// between the tool call and the remote API ends up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Unauthenticated,
            message: message.into(),
            status: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::InvalidResponse,
            message: message.into(),
            status: None,
        }
    }

    /// Build from a non-2xx status. 404 maps to `NotFound`, everything else
    /// to `RemoteStatus`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = if status == 404 {
            ApiErrorKind::NotFound
        } else {
            ApiErrorKind::RemoteStatus(status)
        };
        Self {
            kind,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    /// One-line user-facing rendering used as tool output
    pub fn to_report(&self) -> String {
        match self.status {
            Some(code) => format!("Error {}: {}", code, self.message),
            None => format!("Error: {}", self.message),
        }
    }
}

impl From<ApiError> for String {
    fn from(err: ApiError) -> Self {
        err.to_report()
    }
}

/// Main error type for the early-mcp library
#[derive(Error, Debug)]
pub enum EarlyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using EarlyError
pub type Result<T> = std::result::Result<T, EarlyError>;

impl From<EarlyError> for String {
    fn from(err: EarlyError) -> Self {
        match err {
            EarlyError::Api(api) => api.to_report(),
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // ApiError classification
    // ============================================================================

    #[test]
    fn test_from_status_404_is_not_found() {
        let err = ApiError::from_status(404, "missing");
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.status, Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_status_other_is_remote_status() {
        let err = ApiError::from_status(500, "boom");
        assert_eq!(err.kind, ApiErrorKind::RemoteStatus(500));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_unauthenticated_has_no_status() {
        let err = ApiError::unauthenticated("no credentials");
        assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
        assert_eq!(err.status, None);
    }

    // ============================================================================
    // Rendering
    // ============================================================================

    #[test]
    fn test_report_with_status() {
        let err = ApiError::from_status(422, "Minimum duration is 1 minute");
        assert_eq!(err.to_report(), "Error 422: Minimum duration is 1 minute");
    }

    #[test]
    fn test_report_without_status() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.to_report(), "Error: connection refused");
    }

    #[test]
    fn test_display_includes_kind() {
        let err = ApiError::invalid_response("expected JSON");
        assert_eq!(err.to_string(), "invalid response: expected JSON");
    }

    #[test]
    fn test_early_error_into_string() {
        let s: String = EarlyError::Api(ApiError::from_status(404, "gone")).into();
        assert_eq!(s, "Error 404: gone");

        let s: String = EarlyError::UnknownTool("early_fly".into()).into();
        assert_eq!(s, "Error: unknown tool: early_fly");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: EarlyError = json_err.into();
        assert!(matches!(err, EarlyError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }
}
