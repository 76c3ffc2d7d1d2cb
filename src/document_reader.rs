/*!
 * Text producers for uploaded documents.
 *
 * Each supported format is turned into one decoded text blob that the frame
 * segmenter can work on. A document that yields no usable text fails here
 * with `DocumentError::EmptySource`, before any segmentation happens.
 */

use std::fs;
use std::path::{Path, PathBuf};
use log::debug;

use crate::app_config::IngestConfig;
use crate::errors::DocumentError;
use crate::file_utils::{FileManager, FileType};
use crate::frame::FrameRecord;
use crate::frame_parser;

/// Reads DOCX, PDF and plain text documents
#[derive(Debug, Clone)]
pub struct DocumentReader {
    max_document_bytes: u64,
}

impl DocumentReader {
    pub fn new(max_document_bytes: u64) -> Self {
        Self { max_document_bytes }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.max_document_bytes)
    }

    /// Extract the full text of a document
    pub fn read_text<P: AsRef<Path>>(&self, path: P) -> Result<String, DocumentError> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| unreadable(path, e))?;
        if metadata.len() > self.max_document_bytes {
            return Err(DocumentError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.max_document_bytes,
            });
        }

        let file_type = FileManager::detect_file_type(path).map_err(|e| unreadable(path, e))?;
        let text = match file_type {
            FileType::Docx => docx_lite::extract_text(path).map_err(|e| unreadable(path, e))?,
            FileType::Pdf => pdf_extract::extract_text(path).map_err(|e| unreadable(path, e))?,
            FileType::Text => read_plain_text(path)?,
            FileType::Unknown => return Err(DocumentError::UnsupportedFormat(path.to_path_buf())),
        };

        if text.trim().is_empty() {
            return Err(DocumentError::EmptySource(path.to_path_buf()));
        }

        debug!("Read {} chars of {:?} text from {:?}", text.len(), file_type, path);
        Ok(text)
    }

    /// Extract a document's text on the blocking pool
    pub async fn read_text_async(&self, path: PathBuf) -> Result<String, DocumentError> {
        let reader = self.clone();
        let task_path = path.clone();

        tokio::task::spawn_blocking(move || reader.read_text(&task_path))
            .await
            .map_err(|e| unreadable(&path, e))?
    }

    /// Read a document and segment it into frames
    pub fn extract_frames<P: AsRef<Path>>(&self, path: P) -> Result<Vec<FrameRecord>, DocumentError> {
        let text = self.read_text(path)?;
        Ok(frame_parser::segment(&text))
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::from_config(&IngestConfig::default())
    }
}

fn read_plain_text(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|e| unreadable(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn unreadable(path: &Path, error: impl std::fmt::Display) -> DocumentError {
    DocumentError::Unreadable {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
