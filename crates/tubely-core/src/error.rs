//! Error types module
//!
//! All failures converge into [`AppError`]. Each variant describes how it
//! should be reported through the [`ErrorMetadata`] trait, so the `tubely`
//! binary picks its log level, exit status and operator message without
//! matching on variants itself.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - defines how an error should be presented
pub trait ErrorMetadata {
    /// Process exit status (sysexits.h values)
    fn exit_code(&self) -> u8;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether running the same command again could succeed
    fn is_recoverable(&self) -> bool;

    /// Operator-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be kept out of the operator message
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Remux error: {0}")]
    Remux(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;
const EX_TEMPFAIL: u8 = 75;
const EX_CONFIG: u8 = 78;

/// Static metadata for each variant: (exit_code, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u8, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::Validation(_) => (EX_DATAERR, "VALIDATION_ERROR", false, false, LogLevel::Debug),
        AppError::NotFound(_) => (EX_NOINPUT, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => {
            (EX_DATAERR, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug)
        }
        AppError::Config(_) => (EX_CONFIG, "CONFIG_ERROR", false, false, LogLevel::Error),
        AppError::Probe(_) => (EX_TEMPFAIL, "PROBE_ERROR", true, true, LogLevel::Warn),
        AppError::Remux(_) => (EX_DATAERR, "REMUX_ERROR", false, true, LogLevel::Error),
        AppError::Io(_) => (EX_IOERR, "IO_ERROR", true, true, LogLevel::Error),
        AppError::Storage(_) => (EX_TEMPFAIL, "STORAGE_ERROR", true, true, LogLevel::Error),
        AppError::Signing(_) => (EX_SOFTWARE, "SIGNING_ERROR", false, true, LogLevel::Error),
        AppError::Database(_) => (EX_TEMPFAIL, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::Internal(_) => (EX_SOFTWARE, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn exit_code(&self) -> u8 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Probe(_) => "Failed to inspect media file".to_string(),
            AppError::Remux(_) => "Failed to process video".to_string(),
            AppError::Io(_) => "Failed to handle uploaded file".to_string(),
            AppError::Storage(_) => "Failed to store file".to_string(),
            AppError::Signing(_) => "Failed to generate access URL".to_string(),
            AppError::Database(_) => "Failed to access video metadata".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation() {
        let err = AppError::Validation("Invalid media type".to_string());
        assert_eq!(err.exit_code(), 65);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Invalid media type");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_storage() {
        let err = AppError::Storage("bucket missing".to_string());
        assert_eq!(err.exit_code(), 75);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to store file");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_remux_hides_details() {
        let err = AppError::Remux("ffmpeg exited with status 1: moov atom not found".to_string());
        assert_eq!(err.error_code(), "REMUX_ERROR");
        assert!(!err.client_message().contains("moov"));
    }

    #[test]
    fn test_error_metadata_config() {
        let err = AppError::Config("S3_BUCKET must be set for the s3 backend".to_string());
        assert_eq!(err.exit_code(), 78);
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains("S3_BUCKET"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, AppError::Io(ref msg) if msg.contains("disk full")));
    }
}
