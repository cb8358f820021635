/*!
 * Word stream and sentence types.
 *
 * Words are produced by an external speech recognizer and are immutable once
 * produced. This module decodes the recognizer output, rejects structurally
 * invalid streams at the boundary, and hosts the sentence segmenter.
 *
 * # Architecture
 *
 * - `segmenter`: Groups words into sentences through a pluggable
 *   boundary detector
 */

pub mod segmenter;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::TranscriptError;

pub use segmenter::{PunctuationBoundaryDetector, SentenceBoundaryDetector, SentenceSegmenter, SentenceSpan};

/// Probability assumed for words the recognizer did not score
pub const DEFAULT_WORD_PROBABILITY: f64 = 1.0;

/// A single recognized token with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Token text as produced by the recognizer (may carry leading whitespace)
    #[serde(alias = "word")]
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Recognition probability in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl Word {
    /// Create a scored word
    pub fn new(text: impl Into<String>, start: f64, end: f64, probability: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            probability: Some(probability),
        }
    }

    /// Token text without recognizer padding
    pub fn token(&self) -> &str {
        self.text.trim()
    }

    /// Probability, defaulting to 1.0 when unscored
    pub fn confidence(&self) -> f64 {
        self.probability.unwrap_or(DEFAULT_WORD_PROBABILITY)
    }
}

/// A run of words forming one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Words joined with single spaces
    pub text: String,
    /// Start of the first word
    pub start: f64,
    /// End of the last word
    pub end: f64,
    /// Constituent words in order
    pub words: Vec<Word>,
}

impl Sentence {
    /// Build a sentence from a non-empty word run.
    ///
    /// Returns `None` for an empty run.
    pub fn from_words(words: Vec<Word>) -> Option<Self> {
        let start = words.first()?.start;
        let end = words.last()?.end;
        Some(Self {
            text: join_words(words.iter()),
            start,
            end,
            words,
        })
    }
}

/// Join word tokens with a single space
pub fn join_words<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut text = String::new();
    for (i, word) in words.into_iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(word.token());
    }
    text
}

/// Shapes accepted for a serialized word stream
#[derive(Deserialize)]
#[serde(untagged)]
enum WordStreamDocument {
    Words(Vec<Word>),
    Wrapped { words: Vec<Word> },
    Recognizer { segments: Vec<RecognizerSegment> },
}

#[derive(Deserialize)]
struct RecognizerSegment {
    #[serde(default)]
    words: Vec<Word>,
}

/// Decode a word stream from JSON.
///
/// Accepts a bare array of words, an object with a `words` array, or a
/// recognizer result whose `segments` each carry a `words` array.
pub fn parse_words_json(content: &str) -> Result<Vec<Word>, TranscriptError> {
    let document: WordStreamDocument =
        serde_json::from_str(content).map_err(|e| TranscriptError::Parse(e.to_string()))?;

    let words = match document {
        WordStreamDocument::Words(words) => words,
        WordStreamDocument::Wrapped { words } => words,
        WordStreamDocument::Recognizer { segments } => {
            debug!("Flattening {} recognizer segments", segments.len());
            segments.into_iter().flat_map(|s| s.words).collect()
        }
    };

    Ok(words)
}

/// Reject word streams that violate the producer contract
pub fn validate_words(words: &[Word]) -> Result<(), TranscriptError> {
    let mut previous_start: Option<f64> = None;

    for (index, word) in words.iter().enumerate() {
        if !word.start.is_finite() || !word.end.is_finite() {
            return Err(TranscriptError::NonFiniteTime { index });
        }

        if word.end < word.start {
            return Err(TranscriptError::InvalidTiming {
                index,
                start: word.start,
                end: word.end,
            });
        }

        if let Some(value) = word.probability {
            if !(0.0..=1.0).contains(&value) {
                return Err(TranscriptError::InvalidProbability { index, value });
            }
        }

        if let Some(previous_start) = previous_start {
            if word.start < previous_start {
                return Err(TranscriptError::OutOfOrder {
                    index,
                    previous_start,
                    start: word.start,
                });
            }
        }
        previous_start = Some(word.start);
    }

    Ok(())
}
