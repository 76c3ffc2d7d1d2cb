/*!
 * Database module for persistent storage of parsed frames.
 *
 * This module provides SQLite-based persistence for:
 * - Ingested documents, keyed by canonical source path
 * - The frames extracted from each document, in display order
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, StorageStats};
pub use models::DocumentRecord;
pub use repository::FrameRepository;
