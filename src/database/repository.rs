/*!
 * Repository layer for database operations.
 *
 * Frames are stored per document. Saving a document replaces its whole frame
 * list in one transaction, so a reader never sees a half-written document.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{frame_from_row, DocumentRecord, FRAME_COLUMNS};
use crate::frame::FrameRecord;
use crate::frame_store::ensure_unique;

/// Keyed frame store backed by SQLite
#[derive(Clone)]
pub struct FrameRepository {
    db: DatabaseConnection,
}

impl FrameRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Replace the frames stored for a document.
    ///
    /// The document row is upserted (its `created_at` survives re-ingestion)
    /// and `frame_count` is taken from `frames`.
    pub async fn save_frames(&self, document: &DocumentRecord, frames: &[FrameRecord]) -> Result<()> {
        ensure_unique(frames)?;

        let mut document = document.clone();
        document.frame_count = frames.len() as i64;
        let frames = frames.to_vec();

        self.db
            .transaction_async(move |tx| {
                tx.execute(
                    r#"
                    INSERT INTO documents (key, source_path, content_hash, frame_count, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key) DO UPDATE SET
                        source_path = excluded.source_path,
                        content_hash = excluded.content_hash,
                        frame_count = excluded.frame_count,
                        updated_at = excluded.updated_at
                    "#,
                    params![
                        document.key,
                        document.source_path,
                        document.content_hash,
                        document.frame_count,
                        document.created_at,
                        document.updated_at,
                    ],
                )?;

                tx.execute("DELETE FROM frames WHERE document_key = ?1", [&document.key])?;

                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO frames (document_key, position, {}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    FRAME_COLUMNS
                ))?;

                for (position, frame) in frames.iter().enumerate() {
                    stmt.execute(params![
                        document.key,
                        position as i64,
                        frame.frame_number,
                        frame.frame_tone,
                        frame.content,
                        frame.frame_type,
                        frame.voice_over_required,
                        frame.editing_required,
                        frame.facilitator_costume_props,
                        frame.scene_description,
                        frame.camera_notes,
                        frame.editing_notes,
                        frame.suggestions,
                    ])?;
                }

                debug!("Stored {} frame(s) for {}", frames.len(), document.key);
                Ok(())
            })
            .await
    }

    /// Load a document's frames in stored order; unknown keys yield `[]`
    pub async fn load_frames(&self, key: &str) -> Result<Vec<FrameRecord>> {
        let key = key.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM frames WHERE document_key = ?1 ORDER BY position",
                    FRAME_COLUMNS
                ))?;
                let frames = stmt
                    .query_map([&key], frame_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(frames)
            })
            .await
    }

    /// Get a document by key
    pub async fn get_document(&self, key: &str) -> Result<Option<DocumentRecord>> {
        let key = key.to_string();

        self.db
            .execute_async(move |conn| Self::get_document_sync(conn, &key))
            .await
    }

    fn get_document_sync(conn: &Connection, key: &str) -> Result<Option<DocumentRecord>> {
        let document = conn
            .query_row(
                r#"
                SELECT key, source_path, content_hash, frame_count, created_at, updated_at
                FROM documents WHERE key = ?1
                "#,
                [key],
                DocumentRecord::from_row,
            )
            .optional()?;

        Ok(document)
    }

    /// Find the most recently updated document with this content hash
    pub async fn find_by_hash(&self, content_hash: &str) -> Result<Option<DocumentRecord>> {
        let content_hash = content_hash.to_string();

        self.db
            .execute_async(move |conn| {
                let document = conn
                    .query_row(
                        r#"
                        SELECT key, source_path, content_hash, frame_count, created_at, updated_at
                        FROM documents WHERE content_hash = ?1
                        ORDER BY updated_at DESC LIMIT 1
                        "#,
                        [&content_hash],
                        DocumentRecord::from_row,
                    )
                    .optional()?;
                Ok(document)
            })
            .await
    }

    /// List all documents, most recently updated first
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT key, source_path, content_hash, frame_count, created_at, updated_at
                    FROM documents ORDER BY updated_at DESC, key
                    "#,
                )?;
                let documents = stmt
                    .query_map([], DocumentRecord::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(documents)
            })
            .await
    }

    /// Delete a document and its frames; returns whether it existed
    pub async fn delete_document(&self, key: &str) -> Result<bool> {
        let key = key.to_string();

        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM documents WHERE key = ?1", [&key])?;
                Ok(deleted > 0)
            })
            .await
    }
}
