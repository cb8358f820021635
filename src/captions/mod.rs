/*!
 * Caption cues and the pipeline that produces them.
 *
 * Words are segmented into sentences, packed into cues under reading-speed,
 * duration and length limits, and each cue is wrapped into at most two lines.
 *
 * # Architecture
 *
 * - `grouper`: Greedy sentence packing with oversize splitting
 * - `line_formatter`: Inverted-pyramid two-line wrapping
 */

pub mod grouper;
pub mod line_formatter;

use serde::{Deserialize, Serialize};

use crate::app_config::CaptionConfig;
use crate::transcript::{SentenceBoundaryDetector, SentenceSegmenter, Word};

pub use grouper::CaptionGrouper;
pub use line_formatter::LineFormatter;

/// Hard limits a caption must respect
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionConstraints {
    /// Maximum characters on one line
    pub max_chars_per_line: usize,

    /// Lines per caption, at most 2
    pub max_lines_per_caption: usize,

    /// Maximum on-screen time in seconds
    pub max_duration_secs: f64,

    /// Maximum reading speed in characters per second
    pub max_cps: f64,

    /// Silence between sentences that forces a new caption.
    ///
    /// A fourth limit on top of length, duration and reading speed. `None`
    /// groups on those three alone.
    pub max_pause_secs: Option<f64>,
}

impl Default for CaptionConstraints {
    fn default() -> Self {
        Self {
            max_chars_per_line: 42,
            max_lines_per_caption: 2,
            max_duration_secs: 7.0,
            max_cps: 21.0,
            max_pause_secs: Some(0.5),
        }
    }
}

impl CaptionConstraints {
    /// Character budget for a whole caption
    pub fn max_total_chars(&self) -> usize {
        self.max_chars_per_line * self.max_lines_per_caption.clamp(1, 2)
    }
}

impl From<&CaptionConfig> for CaptionConstraints {
    fn from(config: &CaptionConfig) -> Self {
        Self {
            max_chars_per_line: config.max_chars_per_line,
            max_lines_per_caption: config.max_lines_per_caption,
            max_duration_secs: config.max_caption_duration_secs,
            max_cps: config.max_cps,
            max_pause_secs: config.max_pause_secs,
        }
    }
}

/// One timed on-screen caption
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub start: f64,
    pub end: f64,
    /// One or two display lines
    pub lines: Vec<String>,
    /// Mean word probability
    pub confidence: f64,
    pub word_count: usize,
}

impl Caption {
    /// Lines joined with a newline
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Persisted form of a caption, as consumed by storage and translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRecord {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Translated text, preferred over `text` when rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl CaptionRecord {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
            confidence: None,
            translation: None,
        }
    }

    /// Text to display: the translation when present and non-blank, else the source text
    pub fn display_text(&self) -> &str {
        match self.translation.as_deref() {
            Some(translation) if !translation.trim().is_empty() => translation,
            _ => &self.text,
        }
    }
}

impl From<&Caption> for CaptionRecord {
    fn from(caption: &Caption) -> Self {
        Self {
            start_time: caption.start,
            end_time: caption.end,
            text: caption.text(),
            confidence: Some(caption.confidence),
            translation: None,
        }
    }
}

/// Run the whole pipeline: segment words into sentences, then pack them into captions
pub fn generate_captions(
    words: &[Word],
    detector: &dyn SentenceBoundaryDetector,
    constraints: &CaptionConstraints,
) -> Vec<Caption> {
    let sentences = SentenceSegmenter::new(detector).segment(words);
    CaptionGrouper::new(constraints.clone()).group(&sentences)
}
