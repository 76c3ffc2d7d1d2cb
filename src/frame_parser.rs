use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

use crate::frame::{plain_digits, FrameRecord};

// @module: Frame segmentation of free-form script text

// @const: "Frame 3:" label
static COLON_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+(\d+)\s*:").unwrap()
});

static COLON_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+\d+\s*:").unwrap()
});

// @const: "Frame 3 [00:12]" label, timestamp in group 2
static TIMESTAMP_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+(\d+)\s*\[([^\]]*)\]\s*").unwrap()
});

// Stops at either a timestamped or a colon label
static TIMESTAMP_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+\d+\s*[\[:]").unwrap()
});

// @const: "Frame 3" alone on its line
static LINE_BREAK_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+(\d+)\s*\n").unwrap()
});

static LINE_BREAK_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+\d+").unwrap()
});

// @const: "Frame 3 - body" label
static HYPHEN_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+(\d+)\s*-\s*").unwrap()
});

static HYPHEN_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Frame\s+\d+\s*-").unwrap()
});

// @const: Any line that opens with a frame label
static LABEL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Frame\s+\d+").unwrap()
});

/// Authoring convention used to mark frame boundaries.
///
/// Conventions are tried in the order of [`Convention::ALL`]; the first one
/// that yields at least one frame wins and the others are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `Frame 1: body`
    Colon,
    /// `Frame 1 [00:12] body`
    Timestamped,
    /// `Frame 1` followed by a line break
    LineBreak,
    /// `Frame 1 - body`
    Hyphen,
}

/// A frame candidate before cleanup and deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub frame_number: String,
    pub body: String,
}

impl Convention {
    /// All conventions in priority order
    pub const ALL: [Convention; 4] = [
        Convention::Colon,
        Convention::Timestamped,
        Convention::LineBreak,
        Convention::Hyphen,
    ];

    fn label(&self) -> &'static Regex {
        match self {
            Self::Colon => &COLON_LABEL,
            Self::Timestamped => &TIMESTAMP_LABEL,
            Self::LineBreak => &LINE_BREAK_LABEL,
            Self::Hyphen => &HYPHEN_LABEL,
        }
    }

    fn terminator(&self) -> &'static Regex {
        match self {
            Self::Colon => &COLON_TERMINATOR,
            Self::Timestamped => &TIMESTAMP_TERMINATOR,
            Self::LineBreak => &LINE_BREAK_TERMINATOR,
            Self::Hyphen => &HYPHEN_TERMINATOR,
        }
    }

    /// Find every labelled body of this convention in `text`.
    ///
    /// A body runs from the end of its label to the start of the next
    /// terminator match (or the end of the text). Scanning for the next label
    /// resumes where the previous body stopped, so bodies never overlap.
    /// Bodies are trimmed and timestamped bodies carry their `[timestamp] `
    /// prefix, but no cleanup or deduplication happens here.
    pub fn candidates(&self, text: &str) -> Vec<RawFrame> {
        let label = self.label();
        let terminator = self.terminator();
        let mut candidates = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let Some(caps) = label.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            let body_start = whole.end();
            let body_end = terminator
                .find_at(text, body_start)
                .map_or(text.len(), |m| m.start());

            let frame_number = caps.get(1)
                .map_or("", |m| m.as_str())
                .trim()
                .to_string();
            let mut body = text[body_start..body_end].trim().to_string();

            if *self == Self::Timestamped {
                let timestamp = caps.get(2).map_or("", |m| m.as_str().trim());
                if !timestamp.is_empty() {
                    body = format!("[{}] {}", timestamp, body);
                }
            }

            candidates.push(RawFrame { frame_number, body });
            pos = body_end;
        }

        candidates
    }

    /// Render a frame back into this convention's label syntax
    pub fn format_frame(&self, frame: &FrameRecord) -> String {
        match self {
            Self::Colon => format!("Frame {}: {}\n", frame.frame_number, frame.content),
            Self::Timestamped => {
                // A leading "[ts] " prefix becomes the label timestamp again
                match split_timestamp(&frame.content) {
                    Some((timestamp, body)) => {
                        format!("Frame {} [{}] {}\n", frame.frame_number, timestamp, body)
                    }
                    None => format!("Frame {} [] {}\n", frame.frame_number, frame.content),
                }
            }
            Self::LineBreak => format!("Frame {}\n{}\n", frame.frame_number, frame.content),
            Self::Hyphen => format!("Frame {} - {}\n", frame.frame_number, frame.content),
        }
    }

    /// Short lowercase name used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Colon => "colon",
            Self::Timestamped => "timestamped",
            Self::LineBreak => "line-break",
            Self::Hyphen => "hyphen",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Segment script text into frames.
///
/// Tries each [`Convention`] in priority order and commits to the first one
/// producing at least one frame. Returns an empty vector when no convention
/// matches; that is a normal outcome, not an error.
pub fn segment(text: &str) -> Vec<FrameRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    for convention in Convention::ALL {
        let frames = segment_with_convention(text, convention);
        if !frames.is_empty() {
            debug!("Segmented {} frame(s) using the {} convention", frames.len(), convention);
            return frames;
        }
    }

    debug!("No frame labels recognized in {} chars of text", text.len());
    Vec::new()
}

/// Segment text using a single convention, without falling back to others
pub fn segment_with_convention(text: &str, convention: Convention) -> Vec<FrameRecord> {
    let mut seen = HashSet::new();
    let mut frames = Vec::new();

    for raw in convention.candidates(text) {
        let Some(content) = clean_body(&raw.body) else {
            continue;
        };

        if !seen.insert(raw.frame_number.clone()) {
            debug!("Skipping duplicate frame {}", raw.frame_number);
            continue;
        }

        frames.push(FrameRecord::new(raw.frame_number, content));
    }

    sort_frames(&mut frames);
    frames
}

/// Report which convention `segment` would commit to for this text
pub fn detect_convention(text: &str) -> Option<Convention> {
    Convention::ALL
        .into_iter()
        .find(|convention| !segment_with_convention(text, *convention).is_empty())
}

/// Render frames as script text in the given convention
pub fn render_script(frames: &[FrameRecord], convention: Convention) -> String {
    frames.iter().map(|frame| convention.format_frame(frame)).collect()
}

/// Cut a body at the first line that opens a new frame label.
///
/// Returns `None` when nothing but whitespace is left.
pub fn clean_body(body: &str) -> Option<String> {
    let kept: Vec<&str> = body
        .trim()
        .split('\n')
        .take_while(|line| !LABEL_LINE.is_match(line))
        .collect();

    let cleaned = kept.join("\n").trim().to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Order frame numbers: ASCII integers ascending by value (any length),
/// then anything else, such as non-ASCII digits, lexicographically.
pub fn compare_frame_numbers(a: &str, b: &str) -> Ordering {
    match (plain_digits(a), plain_digits(b)) {
        // Without leading zeros a longer digit string is a larger integer
        (Some(x), Some(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Stable sort of frames by frame number
pub fn sort_frames(frames: &mut [FrameRecord]) {
    let irregular = frames.iter().filter(|f| f.plain_number().is_none()).count();
    if irregular > 0 {
        warn!("{} frame number(s) are not plain integers; ordering them after numbered frames", irregular);
    }

    frames.sort_by(|a, b| compare_frame_numbers(&a.frame_number, &b.frame_number));
}

fn split_timestamp(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix('[')?;
    let (timestamp, body) = rest.split_once(']')?;
    Some((timestamp, body.trim_start()))
}
