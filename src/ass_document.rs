/*!
 * Advanced SubStation Alpha document emission.
 *
 * A document is one `Default` style plus one dialogue line per caption, on a
 * fixed 1280x720 canvas. Documents are rebuilt from scratch on every render;
 * identical inputs produce byte-identical text.
 */

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::captions::{Caption, CaptionRecord};
use crate::style::ResolvedStyle;
use crate::timecode::format_timecode;

pub const PLAY_RES_X: u32 = 1280;
pub const PLAY_RES_Y: u32 = 720;

const STYLE_NAME: &str = "Default";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENTS_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Right-to-left embedding
const RLE: char = '\u{202B}';
/// Pop directional formatting
const PDF: char = '\u{202C}';

static RTL_SCRIPT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Arabic}\p{Hebrew}\p{Syriac}\p{Thaana}\p{Nko}]").unwrap()
});

/// Whether `text` contains right-to-left script
pub fn contains_rtl(text: &str) -> bool {
    RTL_SCRIPT_REGEX.is_match(text)
}

/// Prepare caption text for a dialogue line.
///
/// Right-to-left text is wrapped in embedding marks, newlines become `\N`, and
/// backslashes and override braces are escaped.
pub fn escape_dialogue_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let wrapped = if contains_rtl(&text) {
        format!("{RLE}{text}{PDF}")
    } else {
        text
    };

    let mut escaped = String::with_capacity(wrapped.len() + 8);
    for c in wrapped.chars() {
        match c {
            '\n' => escaped.push_str("\\N"),
            '\\' => escaped.push_str("\\\\"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn flag(value: bool) -> i8 {
    if value { -1 } else { 0 }
}

/// One timed line in the `[Events]` section
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueEvent {
    pub start: String,
    pub end: String,
    /// Escaped text, ready to emit
    pub text: String,
}

impl DialogueEvent {
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        Self {
            start: format_timecode(start),
            end: format_timecode(end),
            text: escape_dialogue_text(text),
        }
    }
}

impl fmt::Display for DialogueEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Dialogue: 0,{},{},{},,0,0,0,,{}",
            self.start, self.end, STYLE_NAME, self.text
        )
    }
}

/// A complete subtitle document
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    title: String,
    style: ResolvedStyle,
    events: Vec<DialogueEvent>,
}

impl SubtitleDocument {
    /// Build from persisted caption records, preferring translations.
    ///
    /// Records whose display text is blank are skipped.
    pub fn from_records(records: &[CaptionRecord], style: ResolvedStyle) -> Self {
        let events: Vec<DialogueEvent> = records
            .iter()
            .filter(|r| !r.display_text().trim().is_empty())
            .map(|r| DialogueEvent::new(r.start_time, r.end_time, r.display_text()))
            .collect();

        debug!(
            "Built document with {} dialogue lines from {} captions",
            events.len(),
            records.len()
        );

        Self {
            title: format!("{} Generated Subtitles", env!("CARGO_PKG_NAME")),
            style,
            events,
        }
    }

    /// Build directly from freshly generated captions
    pub fn from_captions(captions: &[Caption], style: ResolvedStyle) -> Self {
        let records: Vec<CaptionRecord> = captions.iter().map(CaptionRecord::from).collect();
        Self::from_records(&records, style)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn events(&self) -> &[DialogueEvent] {
        &self.events
    }

    /// The `Style:` line for the resolved style
    pub fn style_line(&self) -> String {
        let s = &self.style;
        format!(
            "Style: {},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},1",
            STYLE_NAME,
            s.font_name,
            s.font_size,
            s.primary_color,
            s.secondary_color,
            s.outline_color,
            s.back_color,
            flag(s.bold),
            flag(s.italic),
            flag(s.underline),
            flag(s.strike_out),
            s.scale_x,
            s.scale_y,
            s.spacing,
            s.angle,
            s.border_style.code(),
            s.outline,
            s.shadow,
            s.alignment,
            s.margin_l,
            s.margin_r,
            s.margin_v,
        )
    }

    /// Full document text
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// SHA-256 of the rendered text, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "WrapStyle: 0")?;
        writeln!(f, "PlayResX: {}", PLAY_RES_X)?;
        writeln!(f, "PlayResY: {}", PLAY_RES_Y)?;
        writeln!(f, "ScaledBorderAndShadow: yes")?;
        writeln!(f)?;
        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "{}", STYLE_FORMAT)?;
        writeln!(f, "{}", self.style_line())?;
        writeln!(f)?;
        writeln!(f, "[Events]")?;
        writeln!(f, "{}", EVENTS_FORMAT)?;
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}
