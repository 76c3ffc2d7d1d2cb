use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::frame::{DEFAULT_FRAME_TONE, DEFAULT_FRAME_TYPE};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Where frames are persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Document ingestion limits
    #[serde(default)]
    pub ingest: IngestConfig,

    /// PDF report layout
    #[serde(default)]
    pub report: ReportConfig,

    /// Descriptive defaults applied to freshly parsed frames
    #[serde(default)]
    pub defaults: FrameDefaults,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Persistence settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// SQLite database path; the user data directory is used when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// JSON file holding the current working set of frames
    #[serde(default = "default_frames_json_path")]
    pub frames_json_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            frames_json_path: default_frames_json_path(),
        }
    }
}

/// Ingestion settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IngestConfig {
    /// Documents larger than this are rejected before extraction
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,

    /// How many documents a folder ingest reads at once
    #[serde(default = "default_concurrent_documents")]
    pub concurrent_documents: usize,

    /// File extensions picked up when ingesting a folder
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            concurrent_documents: default_concurrent_documents(),
            supported_extensions: default_supported_extensions(),
        }
    }
}

/// Page size of the exported report
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    // @returns: (width, height) in PDF points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::Letter => (612.0, 792.0),
        }
    }
}

/// Report layout settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportConfig {
    /// Title printed at the top of the first page
    #[serde(default = "default_report_title")]
    pub title: String,

    #[serde(default)]
    pub page_size: PageSize,

    /// Page margin in points, applied on all four sides
    #[serde(default = "default_margin_pt")]
    pub margin_pt: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            page_size: PageSize::default(),
            margin_pt: default_margin_pt(),
        }
    }
}

/// Descriptive defaults for new frames
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FrameDefaults {
    #[serde(default = "default_frame_tone")]
    pub frame_tone: String,

    #[serde(default = "default_frame_type")]
    pub frame_type: String,
}

impl Default for FrameDefaults {
    fn default() -> Self {
        Self {
            frame_tone: default_frame_tone(),
            frame_type: default_frame_type(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_frames_json_path() -> PathBuf {
    PathBuf::from("frames.json")
}

fn default_max_document_bytes() -> u64 {
    20 * 1024 * 1024 // 20 MiB
}

fn default_concurrent_documents() -> usize {
    4
}

fn default_supported_extensions() -> Vec<String> {
    vec!["docx".to_string(), "pdf".to_string(), "txt".to_string()]
}

fn default_report_title() -> String {
    "Frame Details Document".to_string()
}

fn default_margin_pt() -> f32 {
    30.0
}

fn default_frame_tone() -> String {
    DEFAULT_FRAME_TONE.to_string()
}

fn default_frame_type() -> String {
    DEFAULT_FRAME_TYPE.to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.ingest.concurrent_documents == 0 {
            return Err(anyhow!("ingest.concurrent_documents must be at least 1"));
        }

        if self.ingest.max_document_bytes == 0 {
            return Err(anyhow!("ingest.max_document_bytes must be greater than 0"));
        }

        if self.ingest.supported_extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(anyhow!("ingest.supported_extensions must list at least one extension"));
        }

        if self.defaults.frame_tone.trim().is_empty() || self.defaults.frame_type.trim().is_empty() {
            return Err(anyhow!("Frame tone and frame type defaults cannot be empty"));
        }

        // Margins must leave room for the table on the smallest page
        let (width, height) = self.report.page_size.dimensions();
        let margin = self.report.margin_pt;
        if !(0.0..width.min(height) / 4.0).contains(&margin) {
            return Err(anyhow!("report.margin_pt {} is out of range", margin));
        }

        if self.storage.frames_json_path.as_os_str().is_empty() {
            return Err(anyhow!("storage.frames_json_path cannot be empty"));
        }

        Ok(())
    }
}
