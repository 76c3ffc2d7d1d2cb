/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use chrono::Utc;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::frame::FrameRecord;

/// A stored document and the summary of its frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Canonical source path, primary key
    pub key: String,
    /// Path as given when the document was ingested
    pub source_path: String,
    /// SHA-256 of the document bytes
    pub content_hash: String,
    /// Number of frames stored for the document
    pub frame_count: i64,
    /// Creation time (RFC 3339)
    pub created_at: String,
    /// Last update time (RFC 3339)
    pub updated_at: String,
}

impl DocumentRecord {
    /// Create a record stamped with the current time
    pub fn new(key: String, source_path: String, content_hash: String, frame_count: i64) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            key,
            source_path,
            content_hash,
            frame_count,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            source_path: row.get(1)?,
            content_hash: row.get(2)?,
            frame_count: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl fmt::Display for DocumentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} frame(s), updated {})",
            self.source_path, self.frame_count, self.updated_at
        )
    }
}

/// Column list shared by every frame query, in `frame_from_row` order
pub(crate) const FRAME_COLUMNS: &str = "frame_number, frame_tone, content, frame_type, \
     voice_over_required, editing_required, facilitator_costume_props, \
     scene_description, camera_notes, editing_notes, suggestions";

/// Build a frame from a row selected with `FRAME_COLUMNS`
pub(crate) fn frame_from_row(row: &Row<'_>) -> rusqlite::Result<FrameRecord> {
    Ok(FrameRecord {
        frame_number: row.get(0)?,
        frame_tone: row.get(1)?,
        content: row.get(2)?,
        frame_type: row.get(3)?,
        voice_over_required: row.get(4)?,
        editing_required: row.get(5)?,
        facilitator_costume_props: row.get(6)?,
        scene_description: row.get(7)?,
        camera_notes: row.get(8)?,
        editing_notes: row.get(9)?,
        suggestions: row.get(10)?,
    })
}
