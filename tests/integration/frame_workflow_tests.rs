/*!
 * Integration tests for the ingest, edit and export workflow
 */

use anyhow::Result;
use storyframe::app_controller::{Controller, IngestOutcome};
use storyframe::database::FrameRepository;
use storyframe::errors::AppError;
use crate::common;

/// Test that ingesting a script stores its frames and makes them current
#[tokio::test]
async fn test_ingest_withTextScript_shouldStoreAndWriteFrameFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    let summary = controller.ingest(&script, false).await?;
    assert_eq!(summary.outcome, IngestOutcome::Stored);
    assert_eq!(summary.frame_count, 3);

    let stored = controller.frames(&summary.key).await?;
    let current = controller.current_frames()?;
    assert_eq!(stored, current);
    assert_eq!(current[1].content, "Close-up of the experiment.");
    assert!(temp_dir.path().join("frames.json").exists());

    let documents = controller.documents().await?;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].frame_count, 3);
    Ok(())
}

/// Test that unchanged documents are skipped unless forced
#[tokio::test]
async fn test_ingest_twice_shouldSkipUnchangedUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    controller.ingest(&script, false).await?;
    let again = controller.ingest(&script, false).await?;
    assert_eq!(again.outcome, IngestOutcome::Unchanged);
    assert_eq!(again.frame_count, 3);

    let forced = controller.ingest(&script, true).await?;
    assert_eq!(forced.outcome, IngestOutcome::Stored);

    std::fs::write(&script, "Frame 1: Rewritten opening")?;
    let changed = controller.ingest(&script, false).await?;
    assert_eq!(changed.outcome, IngestOutcome::Stored);
    assert_eq!(controller.current_frames()?.len(), 1);
    Ok(())
}

/// Test that a document without labels is reported but not stored
#[tokio::test]
async fn test_ingest_withoutLabels_shouldReportNoFrames() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notes = common::create_test_file(temp_dir.path(), "notes.txt", "Shopping list: eggs, milk")?;
    let controller = common::test_controller(temp_dir.path())?;

    let summary = controller.ingest(&notes, false).await?;
    assert_eq!(summary.outcome, IngestOutcome::NoFrames);
    assert!(controller.documents().await?.is_empty());
    assert!(!temp_dir.path().join("frames.json").exists());
    Ok(())
}

/// Test that looking up frames by path finds the stored document
#[tokio::test]
async fn test_frames_byPath_shouldResolveDocumentKey() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    controller.ingest(&script, false).await?;
    let by_path = controller.frames(&script.to_string_lossy()).await?;
    assert_eq!(by_path.len(), 3);

    assert!(controller.frames("unknown.docx").await?.is_empty());
    Ok(())
}

/// Test that configured defaults replace the built-in tone and type
#[tokio::test]
async fn test_ingest_withConfiguredDefaults_shouldApplyThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;

    let mut config = common::test_config(temp_dir.path());
    config.defaults.frame_tone = "Energetic".to_string();
    config.defaults.frame_type = "Animation".to_string();
    let controller = Controller::with_repository(config, FrameRepository::new_in_memory()?);

    controller.ingest(&script, false).await?;
    let frames = controller.current_frames()?;
    assert!(frames.iter().all(|f| f.frame_tone == "Energetic" && f.frame_type == "Animation"));
    Ok(())
}

/// Test that parsing previews frames without persisting them
#[tokio::test]
async fn test_parse_shouldNotStoreAnything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    let frames = controller.parse(&script).await?;
    assert_eq!(frames.len(), 3);
    assert!(controller.documents().await?.is_empty());
    assert!(controller.current_frames()?.is_empty());
    Ok(())
}

/// Test that edits saved to the frame file are exported
#[tokio::test]
async fn test_saveFrames_thenExport_shouldWritePdf() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    controller.ingest(&script, false).await?;

    let mut frames = controller.current_frames()?;
    frames[0].scene_description = "Classroom, morning light".to_string();
    frames[0].voice_over_required = true;
    controller.save_frames(&frames)?;
    assert_eq!(controller.current_frames()?, frames);

    let output = temp_dir.path().join("out").join("frames_export.pdf");
    let exported = controller.export(&output, None).await?;
    assert_eq!(exported, 3);

    let bytes = std::fs::read(&output)?;
    assert!(bytes.starts_with(b"%PDF"));
    Ok(())
}

/// Test that exporting a stored document ignores the frame file
#[tokio::test]
async fn test_export_storedDocument_shouldUseRepository() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    let summary = controller.ingest(&script, false).await?;
    controller.save_frames(&[])?;

    let output = temp_dir.path().join("doc.pdf");
    assert_eq!(controller.export(&output, Some(&summary.key)).await?, 3);
    Ok(())
}

/// Test that exporting nothing is reported as a missing-frames error
#[tokio::test]
async fn test_export_withNoFrames_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::test_controller(temp_dir.path())?;
    let output = temp_dir.path().join("empty.pdf");

    let err = controller.export(&output, None).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::NoFrames(_))));
    assert!(!output.exists());
    Ok(())
}

/// Test that duplicate frame numbers are rejected on save
#[tokio::test]
async fn test_saveFrames_withDuplicates_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::test_controller(temp_dir.path())?;

    let frames = vec![
        storyframe::FrameRecord::new("1", "a"),
        storyframe::FrameRecord::new("1", "b"),
    ];
    assert!(controller.save_frames(&frames).is_err());
    Ok(())
}

/// Test that a folder ingest counts every outcome
#[tokio::test]
async fn test_ingestFolder_shouldSummarizeOutcomes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let scripts = temp_dir.path().join("scripts");
    std::fs::create_dir_all(&scripts)?;

    common::create_test_script(&scripts, "one.txt")?;
    common::create_test_file(&scripts, "two.txt", "Frame 1 - Hyphen body\nFrame 2 - More")?;
    common::create_test_file(&scripts, "plain.txt", "No frame labels at all")?;
    common::create_test_file(&scripts, "blank.txt", "   ")?;
    common::create_test_file(&scripts, "ignored.rtf", "Frame 1: skipped")?;

    let controller = common::test_controller(temp_dir.path())?;

    let summary = controller.ingest_folder(&scripts, false).await?;
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.without_frames, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.unchanged, 0);

    let again = controller.ingest_folder(&scripts, false).await?;
    assert_eq!(again.unchanged, 2);
    assert_eq!(again.stored, 0);

    assert_eq!(controller.documents().await?.len(), 2);
    assert!(controller.current_frames()?.is_empty());
    Ok(())
}

/// Test that a missing folder is an error
#[tokio::test]
async fn test_ingestFolder_missingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::test_controller(temp_dir.path())?;

    assert!(controller.ingest_folder(&temp_dir.path().join("nope"), false).await.is_err());
    Ok(())
}

/// Test that a document edited down to no frames loses its stored frames
#[tokio::test]
async fn test_ingest_afterLabelsRemoved_shouldDropStaleDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    let first = controller.ingest(&script, false).await?;
    assert_eq!(first.outcome, IngestOutcome::Stored);

    std::fs::write(&script, "The frames were moved to another draft.")?;
    let second = controller.ingest(&script, false).await?;
    assert_eq!(second.outcome, IngestOutcome::NoFrames);

    assert!(controller.documents().await?.is_empty());
    assert!(controller.frames(&first.key).await?.is_empty());

    // Restoring the labels stores the document again rather than reporting it unchanged
    common::create_test_script(temp_dir.path(), "script.txt")?;
    assert_eq!(controller.ingest(&script, false).await?.outcome, IngestOutcome::Stored);
    Ok(())
}

/// Test that storage totals follow ingestion
#[tokio::test]
async fn test_storageStats_shouldCountDocumentsAndFrames() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "script.txt")?;
    let controller = common::test_controller(temp_dir.path())?;

    controller.ingest(&script, false).await?;

    let stats = controller.storage_stats().await?;
    assert_eq!(stats.documents, 1);
    assert_eq!(stats.frames, 3);
    Ok(())
}

/// Test that an unusable report margin is rejected when the controller is built
#[test]
fn test_withConfig_withOversizedMargin_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.report.margin_pt = 500.0;

    assert!(Controller::with_config(config).is_err());
    assert!(!temp_dir.path().join("storyframe.db").exists());
    Ok(())
}

/// Test that an oversized margin fails the export instead of rendering
#[tokio::test]
async fn test_export_withOversizedMargin_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.report.margin_pt = 500.0;
    let controller = Controller::with_repository(config, FrameRepository::new_in_memory()?);

    controller.save_frames(&[storyframe::FrameRecord::new("1", "x")])?;
    let output = temp_dir.path().join("report.pdf");

    assert!(controller.export(&output, None).await.is_err());
    assert!(!output.exists());
    Ok(())
}
