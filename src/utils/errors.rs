//! Error handling for Avishkar
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the Avishkar application
#[derive(Error, Debug)]
pub enum AvishkarError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Push delivery error: {0}")]
    Push(#[from] PushError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Event is full: {event_id}")]
    EventFull { event_id: i64 },

    #[error("Already registered for event: {event_id}")]
    AlreadyRegistered { event_id: i64 },

    #[error("Registration already checked in: {registration_id}")]
    AlreadyCheckedIn { registration_id: i64 },

    #[error("Entry pass verification failed: {0}")]
    PassVerification(String),

    #[error("Registrations are closed")]
    RegistrationsClosed,

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// FCM push delivery specific errors
#[derive(Error, Debug)]
pub enum PushError {
    #[error("Push request failed: {0}")]
    RequestFailed(String),

    #[error("Push endpoint timeout")]
    Timeout,

    #[error("Invalid push response: {0}")]
    InvalidResponse(String),

    #[error("Push service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for Avishkar operations
pub type Result<T> = std::result::Result<T, AvishkarError>;

/// Result type alias for push delivery operations
pub type PushResult<T> = std::result::Result<T, PushError>;

impl AvishkarError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AvishkarError::Database(_) => false,
            AvishkarError::Migration(_) => false,
            AvishkarError::Push(_) => true,
            AvishkarError::Config(_) => false,
            AvishkarError::PermissionDenied(_) => false,
            AvishkarError::UserNotFound { .. } => false,
            AvishkarError::EventNotFound { .. } => false,
            AvishkarError::RegistrationNotFound { .. } => false,
            AvishkarError::InvalidStateTransition { .. } => false,
            AvishkarError::EventFull { .. } => false,
            AvishkarError::AlreadyRegistered { .. } => false,
            AvishkarError::AlreadyCheckedIn { .. } => false,
            AvishkarError::PassVerification(_) => false,
            AvishkarError::RegistrationsClosed => false,
            AvishkarError::Redis(_) => true,
            AvishkarError::Http(_) => true,
            AvishkarError::Serialization(_) => false,
            AvishkarError::Io(_) => true,
            AvishkarError::Authentication(_) => false,
            AvishkarError::RateLimitExceeded => true,
            AvishkarError::InvalidInput(_) => false,
            AvishkarError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AvishkarError::Database(_) => ErrorSeverity::Critical,
            AvishkarError::Migration(_) => ErrorSeverity::Critical,
            AvishkarError::Config(_) => ErrorSeverity::Critical,
            AvishkarError::PermissionDenied(_) => ErrorSeverity::Warning,
            AvishkarError::Authentication(_) => ErrorSeverity::Warning,
            AvishkarError::PassVerification(_) => ErrorSeverity::Warning,
            AvishkarError::RateLimitExceeded => ErrorSeverity::Warning,
            AvishkarError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code this error maps to on the REST surface
    pub fn status_code(&self) -> StatusCode {
        match self {
            AvishkarError::UserNotFound { .. }
            | AvishkarError::EventNotFound { .. }
            | AvishkarError::RegistrationNotFound { .. } => StatusCode::NOT_FOUND,
            AvishkarError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AvishkarError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AvishkarError::InvalidInput(_)
            | AvishkarError::PassVerification(_)
            | AvishkarError::RegistrationsClosed => StatusCode::BAD_REQUEST,
            AvishkarError::InvalidStateTransition { .. }
            | AvishkarError::EventFull { .. }
            | AvishkarError::AlreadyRegistered { .. }
            | AvishkarError::AlreadyCheckedIn { .. } => StatusCode::CONFLICT,
            AvishkarError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AvishkarError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AvishkarError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures must not leak database or infrastructure details
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error while handling request");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let err = AvishkarError::EventNotFound { event_id: 7 };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AvishkarError::EventFull { event_id: 7 };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = AvishkarError::Authentication("missing token".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = AvishkarError::Config("boom".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            AvishkarError::Config("x".to_string()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            AvishkarError::InvalidInput("x".to_string()).severity(),
            ErrorSeverity::Info
        );
        assert_eq!(
            AvishkarError::RateLimitExceeded.severity(),
            ErrorSeverity::Warning
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(AvishkarError::RateLimitExceeded.is_recoverable());
        assert!(!AvishkarError::RegistrationsClosed.is_recoverable());
        assert!(!AvishkarError::InvalidStateTransition {
            from: "pending".to_string(),
            to: "checked_in".to_string()
        }
        .is_recoverable());
    }
}
