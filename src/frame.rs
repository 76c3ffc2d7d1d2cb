use serde::{Deserialize, Serialize};
use std::fmt;

// @module: Frame record model

/// Default tone assigned to a freshly parsed frame
pub const DEFAULT_FRAME_TONE: &str = "Informative";

/// Default shot type assigned to a freshly parsed frame
pub const DEFAULT_FRAME_TYPE: &str = "Live Footage";

/// A single frame of a script or storyboard.
///
/// The segmenter only fills `frame_number` and `content`. Every other field
/// carries a default and is edited later by whoever consumes the frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    // @field: Frame identifier as written in the source, used as sort/dedup key
    pub frame_number: String,

    #[serde(default = "default_frame_tone")]
    pub frame_tone: String,

    // @field: Body text, may start with a "[timestamp] " prefix
    #[serde(default)]
    pub content: String,

    #[serde(default = "default_frame_type")]
    pub frame_type: String,

    #[serde(default)]
    pub voice_over_required: bool,

    #[serde(default)]
    pub editing_required: bool,

    #[serde(default)]
    pub facilitator_costume_props: String,

    #[serde(default)]
    pub scene_description: String,

    #[serde(default)]
    pub camera_notes: String,

    #[serde(default)]
    pub editing_notes: String,

    #[serde(default)]
    pub suggestions: String,
}

impl FrameRecord {
    /// Create a frame with default descriptive fields
    pub fn new(frame_number: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            frame_number: frame_number.into(),
            frame_tone: default_frame_tone(),
            content: content.into(),
            frame_type: default_frame_type(),
            voice_over_required: false,
            editing_required: false,
            facilitator_costume_props: String::new(),
            scene_description: String::new(),
            camera_notes: String::new(),
            editing_notes: String::new(),
            suggestions: String::new(),
        }
    }

    /// The frame number as ASCII digits without leading zeros, if it is a
    /// plain integer of any size
    pub fn plain_number(&self) -> Option<&str> {
        plain_digits(&self.frame_number)
    }
}

/// Normalize an ASCII-digit string by dropping leading zeros ("007" is "7",
/// "000" is "0"). Anything else, including non-ASCII digits, yields `None`.
pub fn plain_digits(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let stripped = raw.trim_start_matches('0');
    Some(if stripped.is_empty() { "0" } else { stripped })
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Frame {}: [{} / {}]", self.frame_number, self.frame_tone, self.frame_type)?;
        writeln!(f, "{}", self.content)
    }
}

fn default_frame_tone() -> String {
    DEFAULT_FRAME_TONE.to_string()
}

fn default_frame_type() -> String {
    DEFAULT_FRAME_TYPE.to_string()
}
