/*!
 * Tests for error types and conversions
 */

use std::io;
use std::path::PathBuf;
use srt2docx::errors::{AppError, ConfigError, DocumentError, SubtitleError};

#[test]
fn test_configError_invalidField_shouldNameField() {
    let error = ConfigError::invalid("layout.title.color", "expected a hex color");
    let display = format!("{}", error);
    assert!(display.contains("layout.title.color"));
    assert!(display.contains("expected a hex color"));
}

#[test]
fn test_configError_notFound_shouldShowPath() {
    let error = ConfigError::NotFound { path: PathBuf::from("/opt/srt2docx/srt2docx_settings.yaml") };
    assert!(error.to_string().contains("/opt/srt2docx/srt2docx_settings.yaml"));
}

#[test]
fn test_subtitleError_invalidTimestamp_shouldShowLineAndValue() {
    let error = SubtitleError::InvalidTimestamp { line: 12, value: "00:00 -> 00:01".to_string() };
    let display = error.to_string();
    assert!(display.contains("12"));
    assert!(display.contains("00:00 -> 00:01"));
}

#[test]
fn test_appError_fromConfigError_shouldWrapAsConfiguration() {
    let error: AppError = ConfigError::invalid("table.cols", "expected 4").into();
    assert!(matches!(error, AppError::Configuration(_)));
    assert!(error.to_string().starts_with("Configuration error"));
}

#[test]
fn test_appError_inputParse_shouldKeepSource() {
    let error = AppError::InputParse {
        path: PathBuf::from("clip.srt"),
        source: SubtitleError::MissingTimestamp { line: 3 },
    };
    assert!(error.to_string().contains("clip.srt"));
    let source = std::error::Error::source(&error).map(|s| s.to_string());
    assert_eq!(source.as_deref(), Some("Missing time range at line 3"));
}

#[test]
fn test_appError_documentWrite_shouldNameDocument() {
    let error = AppError::DocumentWrite {
        name: "clip".to_string(),
        source: DocumentError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")),
    };
    assert!(error.to_string().contains("clip"));
}

#[test]
fn test_documentError_package_shouldShowLibraryMessage() {
    let error = DocumentError::Package("invalid image".to_string());
    assert_eq!(error.to_string(), "Failed to pack document: invalid image");
}
