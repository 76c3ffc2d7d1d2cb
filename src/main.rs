// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use storyframe::app_config::{self, Config};
use storyframe::app_controller::{Controller, IngestOutcome};
use storyframe::frame::FrameRecord;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract frames from a document, or from every document in a folder
    Ingest {
        /// Document file or directory to process
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Re-parse documents even when their content is unchanged
        #[arg(short, long)]
        force: bool,
    },

    /// List documents stored in the frame database
    List,

    /// Print the frames of a stored document, or the current frame file
    Show {
        /// Document key or path; the current frame file when omitted
        #[arg(value_name = "DOC")]
        document: Option<String>,

        /// Print frames as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the current frames with an edited JSON array
    Save {
        /// JSON file with the edited frames
        #[arg(value_name = "FRAMES_JSON")]
        frames_json: PathBuf,
    },

    /// Segment a document and print its frames without storing them
    Parse {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Export frames as a PDF report
    Export {
        /// Output PDF file
        #[arg(short, long, default_value = "frames_export.pdf")]
        output: PathBuf,

        /// Export a stored document instead of the current frame file
        #[arg(long, value_name = "DOC")]
        document: Option<String>,
    },

    /// Generate shell completions for storyframe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// StoryFrame - frame extraction for video scripts
///
/// Splits script documents into numbered frames, keeps them editable as JSON
/// and exports them as a PDF table.
#[derive(Parser, Debug)]
#[command(name = "storyframe")]
#[command(version)]
#[command(about = "Extract numbered frames from video scripts")]
#[command(long_about = "StoryFrame reads .docx, .pdf and text scripts, splits them into numbered frames and exports them as a PDF report.

EXAMPLES:
    storyframe ingest script.docx              # Extract frames and make them current
    storyframe ingest -f scripts/              # Re-parse every script in a folder
    storyframe show --json > frames.json       # Dump the current frames for editing
    storyframe save frames.json                # Store the edited frames
    storyframe export -o report.pdf            # Export the current frames
    storyframe parse draft.txt                 # Preview frames without storing them
    storyframe completions bash > storyframe.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once at trace and narrow it with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "storyframe", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli.config, cli.log_level.clone())?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Ingest { path, force } => run_ingest(&controller, &path, force).await,
        Commands::List => run_list(&controller).await,
        Commands::Show { document, json } => run_show(&controller, document.as_deref(), json).await,
        Commands::Save { frames_json } => run_save(&controller, &frames_json),
        Commands::Parse { path } => {
            let frames = controller.parse(&path).await?;
            print_json(&frames)
        }
        Commands::Export { output, document } => {
            controller.export(&output, document.as_deref()).await?;
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// Load or create configuration
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

async fn run_ingest(controller: &Controller, path: &Path, force: bool) -> Result<()> {
    if path.is_dir() {
        let summary = controller.ingest_folder(path, force).await?;
        info!("Folder done: {}", summary);
        return Ok(());
    }

    if !path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", path));
    }

    let summary = controller.ingest(path, force).await?;
    match summary.outcome {
        IngestOutcome::Stored => info!("Success: {} frame(s) from {}", summary.frame_count, summary.key),
        IngestOutcome::Unchanged => info!("Unchanged: {} frame(s) already stored for {}", summary.frame_count, summary.key),
        IngestOutcome::NoFrames => warn!("No frames found in {:?}", path),
    }

    Ok(())
}

async fn run_list(controller: &Controller) -> Result<()> {
    let documents = controller.documents().await?;
    if documents.is_empty() {
        info!("No documents stored yet");
        return Ok(());
    }

    for document in documents {
        println!("{}", document);
    }
    println!("\n{}", controller.storage_stats().await?);
    Ok(())
}

async fn run_show(controller: &Controller, document: Option<&str>, json: bool) -> Result<()> {
    let frames = match document {
        Some(document) => controller.frames(document).await?,
        None => controller.current_frames()?,
    };

    if json {
        return print_json(&frames);
    }

    if frames.is_empty() {
        warn!("No frames to show");
    }
    for frame in &frames {
        println!("{}\n", frame);
    }
    Ok(())
}

fn run_save(controller: &Controller, frames_json: &Path) -> Result<()> {
    let file = File::open(frames_json)
        .context(format!("Failed to open frames file: {:?}", frames_json))?;

    let frames: Vec<FrameRecord> = serde_json::from_reader(BufReader::new(file))
        .context(format!("Failed to parse frames file: {:?}", frames_json))?;

    controller.save_frames(&frames)
}

fn print_json(frames: &[FrameRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(frames)
        .context("Failed to serialize frames")?;
    println!("{}", json);
    Ok(())
}
