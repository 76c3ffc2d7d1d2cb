/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use storyframe::file_utils::{FileManager, FileType};
use crate::common;

/// Test that folder scans honor the extension list case-insensitively
#[test]
fn test_find_documents_withMixedFiles_shouldFilterAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    std::fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "b.txt", "Frame 1: b")?;
    common::create_test_file(temp_dir.path(), "a.TXT", "Frame 1: a")?;
    common::create_test_file(temp_dir.path(), "notes.rtf", "ignored")?;
    common::create_test_file(&nested, "c.txt", "Frame 1: c")?;

    let found = FileManager::find_documents(temp_dir.path(), &[".txt".to_string()])?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.TXT", "b.txt", "c.txt"]);
    Ok(())
}

/// Test that content hashes track file contents
#[test]
fn test_hash_file_shouldChangeWithContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "script.txt", "Frame 1: one")?;

    let first = FileManager::hash_file(&path)?;
    assert_eq!(first.len(), 64);
    assert_eq!(first, FileManager::hash_file(&path)?);

    std::fs::write(&path, "Frame 1: changed")?;
    assert_ne!(first, FileManager::hash_file(&path)?);
    Ok(())
}

/// Test that relative and absolute paths map to the same document key
#[test]
fn test_document_key_shouldBeCanonical() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "script.txt", "x")?;
    let dotted = temp_dir.path().join(".").join("script.txt");

    assert_eq!(FileManager::document_key(&path), FileManager::document_key(&dotted));
    assert_eq!(FileManager::document_key("missing/file.txt"), "missing/file.txt");
    Ok(())
}

/// Test file type detection from extension and header
#[test]
fn test_detect_file_type_shouldUseExtensionThenHeader() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = common::create_test_file(temp_dir.path(), "script.md", "# notes")?;
    let pdf = common::create_test_file(temp_dir.path(), "scan.bin", "%PDF-1.4 rest")?;
    let other = common::create_test_file(temp_dir.path(), "data.bin", "plain bytes")?;

    assert_eq!(FileManager::detect_file_type(&text)?, FileType::Text);
    assert_eq!(FileManager::detect_file_type(&pdf)?, FileType::Pdf);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(temp_dir.path().join("nope.txt")).is_err());
    Ok(())
}

/// Test that writing bytes creates missing parent directories
#[test]
fn test_write_bytes_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("deep").join("report.pdf");

    FileManager::write_bytes(&target, b"%PDF")?;
    assert_eq!(std::fs::read(&target)?, b"%PDF");
    Ok(())
}
