/*!
 * Error types for the storyframe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Note that finding no frames in a document is not an error at the parser
 * level; the segmenter returns an empty list and callers decide whether that
 * deserves `AppError::NoFrames`.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a source document into text
#[derive(Error, Debug)]
pub enum DocumentError {
    /// File extension is not one of the supported document kinds
    #[error("Unsupported file type: {0:?}. Please provide a DOCX, PDF or text file")]
    UnsupportedFormat(PathBuf),

    /// The document could not be opened or decoded
    #[error("Error reading {path:?}: {message}")]
    Unreadable {
        /// Document path
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// The document exceeds the configured size limit
    #[error("Document {path:?} is {size} bytes, above the {limit} byte limit")]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Extraction produced no usable text
    #[error("Document appears to be empty or could not be read: {0:?}")]
    EmptySource(PathBuf),
}

/// Errors from frame persistence
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure while reading or writing a frame file
    #[error("Frame file error: {0}")]
    Io(#[from] std::io::Error),

    /// The frame file is not valid frame JSON
    #[error("Invalid frame data: {0}")]
    Format(#[from] serde_json::Error),

    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Two frames share the same frame number
    #[error("Duplicate frame number: {0}")]
    DuplicateFrame(String),
}

/// Errors from PDF report generation
#[derive(Error, Debug)]
pub enum ReportError {
    /// Nothing to render
    #[error("No frames to export")]
    NoFrames,

    /// The PDF writer failed
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for ReportError {
    fn from(error: lopdf::Error) -> Self {
        Self::Pdf(error.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        Self::Pdf(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error while reading a document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error while persisting frames
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Error while rendering the report
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// A command that needs frames found none
    #[error("No frames found: {0}")]
    NoFrames(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
