use anyhow::{Result, Context};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::database::{DatabaseConnection, DocumentRecord, FrameRepository, StorageStats};
use crate::document_reader::DocumentReader;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::frame::FrameRecord;
use crate::frame_parser;
use crate::frame_store::JsonFrameStore;
use crate::report;

// @module: Application controller for frame extraction

/// What happened to a single ingested document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Frames were parsed and stored
    Stored,
    /// Same content as the stored copy, nothing re-parsed
    Unchanged,
    /// The document has text but no recognizable frame structure
    NoFrames,
}

/// Result of ingesting one document
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub key: String,
    pub frame_count: usize,
    pub outcome: IngestOutcome,
}

/// Totals for a folder ingest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub stored: usize,
    pub unchanged: usize,
    pub without_frames: usize,
    pub failed: usize,
}

impl fmt::Display for FolderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stored, {} unchanged, {} without frames, {} failed",
            self.stored, self.unchanged, self.without_frames, self.failed
        )
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    reader: DocumentReader,
    repository: FrameRepository,
    frame_file: JsonFrameStore,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let db = match &config.storage.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };

        Ok(Self::with_repository(config, FrameRepository::new(db)))
    }

    /// Create a controller around an existing repository
    pub fn with_repository(config: Config, repository: FrameRepository) -> Self {
        let reader = DocumentReader::from_config(&config.ingest);
        let frame_file = JsonFrameStore::new(config.storage.frames_json_path.clone());

        Self {
            config,
            reader,
            repository,
            frame_file,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ingest one document and make its frames the current working set
    pub async fn ingest(&self, path: &Path, force: bool) -> Result<IngestSummary> {
        let summary = self.ingest_document(path, force).await?;

        match summary.outcome {
            IngestOutcome::Stored | IngestOutcome::Unchanged => {
                let frames = self.repository.load_frames(&summary.key).await?;
                self.frame_file.save(&frames)
                    .with_context(|| format!("Failed to write frame file {:?}", self.frame_file.path()))?;
            }
            IngestOutcome::NoFrames => {}
        }

        Ok(summary)
    }

    /// Read, segment and store a document without touching the frame file
    async fn ingest_document(&self, path: &Path, force: bool) -> Result<IngestSummary> {
        if !FileManager::file_exists(path) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", path));
        }

        let key = FileManager::document_key(path);
        let hash_path = path.to_path_buf();
        let content_hash = tokio::task::spawn_blocking(move || FileManager::hash_file(hash_path))
            .await
            .context("Hashing task panicked")??;

        if !force {
            if let Some(existing) = self.repository.get_document(&key).await? {
                if existing.content_hash == content_hash {
                    debug!("Skipping {:?}, content unchanged since {}", path, existing.updated_at);
                    return Ok(IngestSummary {
                        key,
                        frame_count: existing.frame_count as usize,
                        outcome: IngestOutcome::Unchanged,
                    });
                }
            }
        }

        let text = self.reader.read_text_async(path.to_path_buf()).await?;
        let mut frames = frame_parser::segment(&text);

        if frames.is_empty() {
            warn!("No frames found in {:?}", path);
            if self.repository.delete_document(&key).await? {
                info!("Removed previously stored frames of {:?}", path);
            }
            return Ok(IngestSummary {
                key,
                frame_count: 0,
                outcome: IngestOutcome::NoFrames,
            });
        }

        self.apply_defaults(&mut frames);

        let document = DocumentRecord::new(
            key.clone(),
            path.to_string_lossy().to_string(),
            content_hash,
            frames.len() as i64,
        );
        self.repository.save_frames(&document, &frames).await?;

        info!("Extracted {} frame(s) from {:?}", frames.len(), path);
        Ok(IngestSummary {
            key,
            frame_count: frames.len(),
            outcome: IngestOutcome::Stored,
        })
    }

    /// Ingest every supported document under a directory
    pub async fn ingest_folder(&self, input_dir: &Path, force: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_documents(input_dir, &self.config.ingest.supported_extensions)?;
        if documents.is_empty() {
            return Err(anyhow::anyhow!("No supported documents found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(documents.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        folder_pb.set_message("Extracting frames");

        let results: Vec<(PathBuf, Result<IngestSummary>)> = stream::iter(documents)
            .map(|path| {
                let pb = folder_pb.clone();
                async move {
                    let result = self.ingest_document(&path, force).await;
                    pb.inc(1);
                    (path, result)
                }
            })
            .buffer_unordered(self.config.ingest.concurrent_documents.max(1))
            .collect()
            .await;

        folder_pb.finish_and_clear();

        let mut summary = FolderSummary::default();
        for (path, result) in results {
            match result {
                Ok(IngestSummary { outcome: IngestOutcome::Stored, .. }) => summary.stored += 1,
                Ok(IngestSummary { outcome: IngestOutcome::Unchanged, .. }) => summary.unchanged += 1,
                Ok(IngestSummary { outcome: IngestOutcome::NoFrames, .. }) => summary.without_frames += 1,
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", path, e);
                    summary.failed += 1;
                }
            }
        }

        info!("Finished in {}: {}", Self::format_duration(start_time.elapsed()), summary);
        Ok(summary)
    }

    /// Parse a document without storing anything
    pub async fn parse(&self, path: &Path) -> Result<Vec<FrameRecord>> {
        let text = self.reader.read_text_async(path.to_path_buf()).await?;
        let mut frames = frame_parser::segment(&text);
        self.apply_defaults(&mut frames);
        Ok(frames)
    }

    /// All stored documents
    pub async fn documents(&self) -> Result<Vec<DocumentRecord>> {
        self.repository.list_documents().await
    }

    /// Totals for the frame database
    pub async fn storage_stats(&self) -> Result<StorageStats> {
        self.repository.connection().stats().await
    }

    /// Frames of a stored document, by key or by path
    pub async fn frames(&self, document: &str) -> Result<Vec<FrameRecord>> {
        let key = self.resolve_key(document).await?;
        self.repository.load_frames(&key).await
    }

    /// The current working set of frames
    pub fn current_frames(&self) -> Result<Vec<FrameRecord>> {
        Ok(self.frame_file.load()?)
    }

    /// Replace the current working set with edited frames
    pub fn save_frames(&self, frames: &[FrameRecord]) -> Result<()> {
        self.frame_file.save(frames)?;
        info!("Saved {} frame(s) to {:?}", frames.len(), self.frame_file.path());
        Ok(())
    }

    /// Render a PDF report of a document's frames, or of the working set
    pub async fn export(&self, output: &Path, document: Option<&str>) -> Result<usize> {
        let frames = match document {
            Some(document) => self.frames(document).await?,
            None => self.current_frames()?,
        };

        if frames.is_empty() {
            let source = document.unwrap_or("the current frame file");
            return Err(AppError::NoFrames(format!("nothing to export from {}", source)).into());
        }

        let bytes = report::render_pdf(&frames, &self.config.report)?;
        FileManager::write_bytes(output, &bytes)?;

        info!("Exported {} frame(s) to {:?}", frames.len(), output);
        Ok(frames.len())
    }

    /// Apply the configured tone and type to freshly parsed frames
    pub fn apply_defaults(&self, frames: &mut [FrameRecord]) {
        let defaults = &self.config.defaults;
        for frame in frames.iter_mut() {
            frame.frame_tone = defaults.frame_tone.clone();
            frame.frame_type = defaults.frame_type.clone();
        }
    }

    async fn resolve_key(&self, document: &str) -> Result<String> {
        if self.repository.get_document(document).await?.is_some() {
            return Ok(document.to_string());
        }
        Ok(FileManager::document_key(document))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
