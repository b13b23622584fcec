//! Output types for the `tubely` command-line tool.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tubely_core::{AppError, Dimensions, ErrorMetadata, LogLevel, Orientation};

/// Result of `tubely probe`.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
}

impl ProbeReport {
    pub fn new(path: &Path, dimensions: Dimensions) -> Self {
        Self {
            path: path.display().to_string(),
            width: dimensions.width,
            height: dimensions.height,
            orientation: dimensions.orientation(),
        }
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Log `err` at its own level and build the line shown on stderr.
///
/// Sensitive details only go to the log; the operator sees the client message.
pub fn report_error(err: &AppError) -> String {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, code, "Command failed"),
        LogLevel::Warn => tracing::warn!(error = %err, code, "Command failed"),
        LogLevel::Error => tracing::error!(error = %err, code, "Command failed"),
    }

    let mut line = format!("error[{}]: {}", code, err.client_message());
    if err.is_recoverable() {
        line.push_str(" (temporary failure, retrying may succeed)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_report_serializes_orientation() {
        let report = ProbeReport::new(Path::new("clip.mp4"), Dimensions::new(1080, 1920));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["width"], 1080);
        assert_eq!(json["height"], 1920);
        assert_eq!(json["orientation"], "portrait");
    }

    #[test]
    fn report_hides_sensitive_details() {
        let err = AppError::Storage("s3://tubely-videos: 403 SignatureDoesNotMatch".to_string());
        let line = report_error(&err);
        assert!(line.starts_with("error[STORAGE_ERROR]: Failed to store file"));
        assert!(line.contains("retrying may succeed"));
        assert!(!line.contains("SignatureDoesNotMatch"));
        assert_eq!(err.exit_code(), 75);
    }

    #[test]
    fn report_shows_validation_message() {
        let err = AppError::Validation("Invalid file type, only MP4 is allowed".to_string());
        let line = report_error(&err);
        assert_eq!(line, "error[VALIDATION_ERROR]: Invalid file type, only MP4 is allowed");
        assert_eq!(err.exit_code(), 65);
    }
}
