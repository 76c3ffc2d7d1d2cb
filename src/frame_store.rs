use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use log::debug;

use crate::errors::StoreError;
use crate::frame::FrameRecord;

// @module: JSON file holding the current working set of frames

/// Frames persisted as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonFrameStore {
    path: PathBuf,
}

impl JsonFrameStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load frames; a missing file is an empty store
    pub fn load(&self) -> Result<Vec<FrameRecord>, StoreError> {
        if !self.path.exists() {
            debug!("Frame file {:?} does not exist yet", self.path);
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path)?;
        let frames: Vec<FrameRecord> = serde_json::from_str(&data)?;
        Ok(frames)
    }

    /// Replace the stored frames
    pub fn save(&self, frames: &[FrameRecord]) -> Result<(), StoreError> {
        ensure_unique(frames)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(frames)?;
        fs::write(&self.path, json)?;
        debug!("Saved {} frame(s) to {:?}", frames.len(), self.path);
        Ok(())
    }
}

/// Reject frame lists that reuse a frame number
pub fn ensure_unique(frames: &[FrameRecord]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for frame in frames {
        if !seen.insert(frame.frame_number.as_str()) {
            return Err(StoreError::DuplicateFrame(frame.frame_number.clone()));
        }
    }
    Ok(())
}
