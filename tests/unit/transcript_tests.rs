/*!
 * Tests for word stream decoding, validation and sentence segmentation
 */

use anyhow::Result;
use captionforge::errors::TranscriptError;
use captionforge::transcript::{
    PunctuationBoundaryDetector, SentenceSegmenter, Word, join_words, parse_words_json, validate_words,
};

use crate::common;

/// Test that the shared sample decodes into the expected words
#[test]
fn test_parseWordsJson_withSample_shouldDecodeAllWords() -> Result<()> {
    let words = parse_words_json(common::SAMPLE_WORDS_JSON)?;
    assert_eq!(words.len(), 6);
    assert_eq!(words[1].token(), "world.");
    assert_eq!(words[5].end, 2.6);
    validate_words(&words)?;
    Ok(())
}

/// Test the wrapped object form and the `word` key with padding
#[test]
fn test_parseWordsJson_withWrappedObject_shouldTrimTokens() -> Result<()> {
    let json = r#"{"words": [
        {"word": " Hi", "start": 0.0, "end": 0.2},
        {"word": " there", "start": 0.2, "end": 0.5}
    ]}"#;

    let words = parse_words_json(json)?;

    assert_eq!(join_words(&words), "Hi there");
    assert_eq!(words[0].probability, None);
    assert_eq!(words[0].confidence(), 1.0);
    Ok(())
}

/// Test that garbage input is reported as a parse error
#[test]
fn test_parseWordsJson_withGarbage_shouldFail() {
    let result = parse_words_json("not json");
    assert!(matches!(result, Err(TranscriptError::Parse(_))));
}

/// Test each structural rejection
#[test]
fn test_validateWords_withBrokenStreams_shouldReportTheOffendingWord() {
    let reversed = vec![Word::new("a", 0.0, 0.5, 0.9), Word::new("b", 1.0, 0.8, 0.9)];
    assert!(matches!(
        validate_words(&reversed),
        Err(TranscriptError::InvalidTiming { index: 1, .. })
    ));

    let out_of_order = vec![Word::new("a", 1.0, 1.5, 0.9), Word::new("b", 0.5, 0.8, 0.9)];
    assert!(matches!(
        validate_words(&out_of_order),
        Err(TranscriptError::OutOfOrder { index: 1, .. })
    ));

    let bad_probability = vec![Word::new("a", 0.0, 0.5, 1.5)];
    assert!(matches!(
        validate_words(&bad_probability),
        Err(TranscriptError::InvalidProbability { index: 0, .. })
    ));

    let non_finite = vec![Word::new("a", f64::NAN, 0.5, 0.9)];
    assert!(matches!(
        validate_words(&non_finite),
        Err(TranscriptError::NonFiniteTime { index: 0 })
    ));
}

/// Test that segmentation partitions generated streams without losing words
#[test]
fn test_segment_withGeneratedWords_shouldPartitionInOrder() {
    let detector = PunctuationBoundaryDetector::new();
    let segmenter = SentenceSegmenter::new(&detector);

    for seed in 0..20 {
        let words = common::generate_words(120, seed);
        let sentences = segmenter.segment(&words);

        let flattened: Vec<&Word> = sentences.iter().flat_map(|s| s.words.iter()).collect();
        assert_eq!(flattened.len(), words.len(), "seed {}", seed);
        for (a, b) in flattened.iter().zip(words.iter()) {
            assert_eq!(*a, b);
        }

        for sentence in &sentences {
            assert!(!sentence.words.is_empty());
            assert_eq!(sentence.text, join_words(&sentence.words));
        }
    }
}
