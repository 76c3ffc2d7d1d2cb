use anyhow::{Result, Context};
use std::fs;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use sha2::{Digest, Sha256};

// @module: File and directory utilities

// @const: Leading bytes of a PDF file
const PDF_MAGIC: &[u8] = b"%PDF";

// @const: Leading bytes of a ZIP container (DOCX is one)
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find documents whose extension is in `extensions` (case-insensitive)
    pub fn find_documents<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy();
                let wanted = extensions
                    .iter()
                    .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext));
                if wanted {
                    result.push(path.to_path_buf());
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Write bytes to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path.as_ref()))?;
        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// SHA-256 of a file's bytes as lowercase hex
    pub fn hash_file<P: AsRef<Path>>(path: P) -> Result<String> {
        let mut file = File::open(&path)
            .with_context(|| format!("Failed to open file for hashing: {:?}", path.as_ref()))?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Stable key for a document: its canonical path, or the path as given
    /// when it cannot be canonicalized
    pub fn document_key<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        fs::canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .to_string_lossy()
            .to_string()
    }

    /// Detect the document type from the extension, falling back to the
    /// file's leading bytes
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "docx" => return Ok(FileType::Docx),
                "pdf" => return Ok(FileType::Pdf),
                "txt" | "text" | "md" => return Ok(FileType::Text),
                _ => {}
            }
        }

        // Fall back to examining the file header
        let mut header = [0u8; 4];
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?;
        let read = file.read(&mut header)?;
        let header = &header[..read];

        if header.starts_with(PDF_MAGIC) {
            return Ok(FileType::Pdf);
        }
        if header.starts_with(ZIP_MAGIC) {
            return Ok(FileType::Docx);
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing the document types we can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Word document
    Docx,
    /// PDF document
    Pdf,
    /// Plain UTF-8 text
    Text,
    /// Unknown file type
    Unknown,
}
