/*!
 * Sentence segmentation over a word stream.
 *
 * The segmenter rebuilds a flat transcript while recording the character span
 * of each word, asks a boundary detector for sentence spans over that text,
 * and then walks the words once, assigning each to a sentence by offset.
 * Matching on offsets rather than token text keeps repeated words and
 * normalized punctuation unambiguous.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Sentence, Word};

/// Sentence terminators, optional closing quotes/brackets, then whitespace or end of text
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?؟…。]+["'”’»)\]]*(?:\s+|$)"#).unwrap()
});

/// Tokens that end in a period without ending a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "approx", "no",
];

/// Byte span of one sentence within the transcript, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSpan {
    pub start_char: usize,
    pub end_char: usize,
}

impl SentenceSpan {
    pub fn new(start_char: usize, end_char: usize) -> Self {
        Self { start_char, end_char }
    }
}

/// Sentence boundary detection capability.
///
/// Implementations return spans as byte offsets into `text`, in order.
pub trait SentenceBoundaryDetector: Send + Sync {
    fn segment(&self, text: &str) -> Vec<SentenceSpan>;
}

impl<F> SentenceBoundaryDetector for F
where
    F: Fn(&str) -> Vec<SentenceSpan> + Send + Sync,
{
    fn segment(&self, text: &str) -> Vec<SentenceSpan> {
        self(text)
    }
}

/// Rule-based detector splitting on terminal punctuation
#[derive(Debug, Clone, Default)]
pub struct PunctuationBoundaryDetector;

impl PunctuationBoundaryDetector {
    pub fn new() -> Self {
        Self
    }

    /// Whether a period closes an abbreviation or an initial rather than a sentence
    fn is_abbreviation(preceding: &str, terminator: &str) -> bool {
        if terminator != "." {
            return false;
        }

        let Some(token) = preceding.split_whitespace().last() else {
            return false;
        };
        let token = token
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        if token.chars().count() == 1 && token.chars().all(char::is_alphabetic) {
            return true;
        }

        ABBREVIATIONS.contains(&token.as_str())
    }
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !c.is_whitespace())
        .map_or(text.len(), |i| from + i)
}

impl SentenceBoundaryDetector for PunctuationBoundaryDetector {
    fn segment(&self, text: &str) -> Vec<SentenceSpan> {
        let content_len = text.trim_end().len();
        let mut spans = Vec::new();
        let mut start = skip_whitespace(text, 0);

        for m in SENTENCE_END_REGEX.find_iter(text) {
            let terminator = m.as_str().trim_end();
            let end = m.start() + terminator.len();

            if end <= start || m.start() < start {
                continue;
            }

            let bare_terminator = terminator.trim_end_matches(|c: char| !matches!(c, '.' | '!' | '?' | '؟' | '…' | '。'));
            if Self::is_abbreviation(&text[start..m.start()], bare_terminator) {
                continue;
            }

            spans.push(SentenceSpan::new(start, end));
            start = skip_whitespace(text, m.end());
        }

        if start < content_len {
            spans.push(SentenceSpan::new(start, content_len));
        }

        spans
    }
}

/// Character extent of one word inside the flat transcript
#[derive(Debug, Clone, Copy)]
struct WordOffset {
    start_char: usize,
    end_char: usize,
}

/// Build the flat transcript, words joined by a single space
fn build_transcript(words: &[Word]) -> (String, Vec<WordOffset>) {
    let mut transcript = String::new();
    let mut offsets = Vec::with_capacity(words.len());

    for word in words {
        let start_char = transcript.len();
        transcript.push_str(word.token());
        offsets.push(WordOffset {
            start_char,
            end_char: transcript.len(),
        });
        transcript.push(' ');
    }

    (transcript, offsets)
}

/// Groups words into sentences with a boundary detector
pub struct SentenceSegmenter<'d> {
    detector: &'d dyn SentenceBoundaryDetector,
}

impl<'d> SentenceSegmenter<'d> {
    pub fn new(detector: &'d dyn SentenceBoundaryDetector) -> Self {
        Self { detector }
    }

    /// Partition `words` into ordered, contiguous sentences.
    ///
    /// Every word lands in exactly one sentence. Words that straddle a detected
    /// boundary stay with the sentence they start in, and words after the last
    /// span are claimed by the final sentence.
    pub fn segment(&self, words: &[Word]) -> Vec<Sentence> {
        if words.is_empty() {
            return Vec::new();
        }

        let (transcript, offsets) = build_transcript(words);
        let mut spans = self.detector.segment(transcript.trim_end());
        spans.sort_by_key(|span| span.start_char);

        if spans.is_empty() {
            debug!("Boundary detector found no sentences, treating transcript as one sentence");
            spans.push(SentenceSpan::new(0, transcript.len()));
        }

        let mut sentences = Vec::with_capacity(spans.len());
        let mut index = 0;

        for (k, span) in spans.iter().enumerate() {
            let next_start = spans.get(k + 1).map_or(usize::MAX, |s| s.start_char);
            let mut sentence_words = Vec::new();

            while index < words.len() {
                let offset = offsets[index];
                let inside = offset.start_char >= span.start_char && offset.end_char <= span.end_char;

                if !inside {
                    if offset.start_char >= next_start {
                        break;
                    }
                    debug!(
                        "Word {} at [{}, {}) lies outside sentence span [{}, {}), keeping it with this sentence",
                        index, offset.start_char, offset.end_char, span.start_char, span.end_char
                    );
                }

                sentence_words.push(words[index].clone());
                index += 1;
            }

            if let Some(sentence) = Sentence::from_words(sentence_words) {
                sentences.push(sentence);
            }
        }

        debug!("Segmented {} words into {} sentences", words.len(), sentences.len());
        sentences
    }
}
