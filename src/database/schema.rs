/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for the document and frame tables.
 * Databases written by a newer schema version are refused.
 */

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use log::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Foreign keys are a per-connection setting
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(anyhow!(
            "Database schema v{} is newer than this build supports (v{})",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL is ignored for in-memory databases
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // One row per ingested document, keyed by its canonical path
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            key TEXT PRIMARY KEY,
            source_path TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            frame_count INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS frames (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_key TEXT NOT NULL REFERENCES documents(key) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            frame_number TEXT NOT NULL,
            frame_tone TEXT NOT NULL,
            content TEXT NOT NULL,
            frame_type TEXT NOT NULL,
            voice_over_required INTEGER NOT NULL DEFAULT 0,
            editing_required INTEGER NOT NULL DEFAULT 0,
            facilitator_costume_props TEXT NOT NULL DEFAULT '',
            scene_description TEXT NOT NULL DEFAULT '',
            camera_notes TEXT NOT NULL DEFAULT '',
            editing_notes TEXT NOT NULL DEFAULT '',
            suggestions TEXT NOT NULL DEFAULT '',
            UNIQUE(document_key, frame_number)
        );

        CREATE INDEX IF NOT EXISTS idx_frames_document ON frames(document_key, position);
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}
