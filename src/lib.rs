/*!
 * # StoryFrame - frame extraction for video scripts
 *
 * A Rust library that splits a script document into numbered frames and
 * keeps them editable until they are exported as a PDF report.
 *
 * ## Features
 *
 * - Read script text from `.docx`, `.pdf` and plain text files
 * - Segment the text into frames using several labeling conventions:
 *   - `Frame N: ...`
 *   - `Frame N [timestamp] ...`
 *   - `Frame N` on its own line
 *   - `Frame N - ...`
 * - Store parsed frames per document in SQLite and as an editable JSON file
 * - Export frames as a paginated PDF table
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `frame`: The frame record and its descriptive fields
 * - `frame_parser`: Frame segmentation of raw script text
 * - `document_reader`: Text extraction from supported document formats
 * - `frame_store`: JSON file holding the current working set of frames
 * - `database`: SQLite persistence of documents and their frames
 * - `report`: PDF rendering of frame tables
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod frame;
pub mod frame_parser;
pub mod document_reader;
pub mod frame_store;
pub mod database;
pub mod report;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use frame::FrameRecord;
pub use frame_parser::{segment, Convention};
pub use errors::{AppError, DocumentError, ReportError, StoreError};
