/*!
 * Integration tests for PDF report rendering
 */

use anyhow::Result;
use lopdf::Document;
use storyframe::app_config::{PageSize, ReportConfig};
use storyframe::frame_parser;
use storyframe::report;

/// Test that a segmented script renders one page per frame
#[test]
fn test_renderPdf_fromSegmentedScript_shouldHaveOnePagePerFrame() -> Result<()> {
    let frames = frame_parser::segment(crate::common::SAMPLE_SCRIPT);
    let bytes = report::render_pdf(&frames, &ReportConfig::default())?;

    let doc = Document::load_mem(&bytes)?;
    assert_eq!(doc.get_pages().len(), frames.len());
    Ok(())
}

/// Test that letter pages and custom titles render
#[test]
fn test_renderPdf_withLetterPages_shouldSucceed() -> Result<()> {
    let config = ReportConfig {
        title: "Episode 4 shot list".to_string(),
        page_size: PageSize::Letter,
        ..ReportConfig::default()
    };
    let frames = frame_parser::segment("Frame 1: Intro\nFrame 2: Outro");

    let bytes = report::render_pdf(&frames, &config)?;
    assert_eq!(Document::load_mem(&bytes)?.get_pages().len(), 2);
    Ok(())
}

/// Test that text outside the font's character set does not break rendering
#[test]
fn test_renderPdf_withNonLatinText_shouldSucceed() -> Result<()> {
    let frames = frame_parser::segment("Frame 1: 東京 café “quoted”");
    let bytes = report::render_pdf(&frames, &ReportConfig::default())?;
    assert!(bytes.starts_with(b"%PDF"));
    Ok(())
}
