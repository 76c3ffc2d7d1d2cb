/*!
 * Tests for error types
 */

use std::path::PathBuf;
use storyframe::errors::{AppError, DocumentError, ReportError, StoreError};

/// Test that wrapped errors keep their messages
#[test]
fn test_appError_conversions_shouldKeepMessages() {
    let err: AppError = DocumentError::UnsupportedFormat(PathBuf::from("movie.mkv")).into();
    assert!(err.to_string().contains("movie.mkv"));

    let err: AppError = StoreError::DuplicateFrame("7".to_string()).into();
    assert_eq!(err.to_string(), "Storage error: Duplicate frame number: 7");

    let err: AppError = ReportError::NoFrames.into();
    assert_eq!(err.to_string(), "Report error: No frames to export");
}

/// Test that errors round-trip through anyhow and can be downcast
#[test]
fn test_appError_throughAnyhow_shouldDowncast() {
    let err: anyhow::Error = AppError::NoFrames("script.docx".to_string()).into();

    match err.downcast_ref::<AppError>() {
        Some(AppError::NoFrames(source)) => assert_eq!(source, "script.docx"),
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Test that the size limit message names both numbers
#[test]
fn test_tooLarge_shouldReportSizes() {
    let err = DocumentError::TooLarge {
        path: PathBuf::from("big.pdf"),
        size: 2048,
        limit: 1024,
    };
    let message = err.to_string();
    assert!(message.contains("2048"));
    assert!(message.contains("1024"));
}
