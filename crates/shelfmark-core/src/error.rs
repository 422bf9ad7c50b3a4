//! Error types for shelfmark.

use thiserror::Error;

/// Result type alias using shelfmark's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for shelfmark operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Entity absent, or present but not owned by the caller. The two cases
    /// are deliberately indistinguishable so non-owners learn nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, malformed, or expired credential, or an unknown subject.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Batch operation referenced entities outside the caller's scope.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// External identity provider rejected the credential.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Server-side configuration is missing or unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Outbound enrichment call failed. Always recovered into a placeholder
    /// by the adapter; never reaches an API caller.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("category 42".to_string());
        assert_eq!(err.to_string(), "Not found: category 42");
    }

    #[test]
    fn test_error_display_unauthenticated() {
        let err = Error::Unauthenticated("token expired".to_string());
        assert_eq!(err.to_string(), "Unauthenticated: token expired");
    }

    #[test]
    fn test_error_display_permission_denied() {
        let err = Error::PermissionDenied("foreign site in batch".to_string());
        assert_eq!(err.to_string(), "Permission denied: foreign site in batch");
    }

    #[test]
    fn test_error_display_invalid_credential() {
        let err = Error::InvalidCredential("audience mismatch".to_string());
        assert_eq!(err.to_string(), "Invalid credential: audience mismatch");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("GOOGLE_CLIENT_ID is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GOOGLE_CLIENT_ID is not set"
        );
    }

    #[test]
    fn test_error_display_upstream() {
        let err = Error::Upstream("status 503".to_string());
        assert_eq!(err.to_string(), "Upstream error: status 503");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
