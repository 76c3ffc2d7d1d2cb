/*!
 * Common test utilities for the storyframe test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use storyframe::app_config::Config;
use storyframe::app_controller::Controller;
use storyframe::database::FrameRepository;

/// Install env_logger once for the whole test binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A short colon-labeled script
pub const SAMPLE_SCRIPT: &str = "Title page\n\
Frame 1: The facilitator greets the class.\n\
Frame 2: Close-up of the experiment.\n\
Frame 3: Summary of the results.\n";

/// Creates a sample script file for testing
pub fn create_test_script(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SCRIPT)
}

/// Configuration whose frame file lives inside `dir`
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.frames_json_path = dir.join("frames.json");
    config.storage.database_path = Some(dir.join("storyframe.db"));
    config
}

/// Controller backed by an in-memory database and a frame file inside `dir`
pub fn test_controller(dir: &Path) -> Result<Controller> {
    init_logger();
    let repository = FrameRepository::new_in_memory()?;
    Ok(Controller::with_repository(test_config(dir), repository))
}
