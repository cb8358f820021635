/*!
 * Properties of the caption pipeline over generated word streams
 */

use captionforge::captions::{Caption, CaptionConstraints, generate_captions};
use captionforge::transcript::{PunctuationBoundaryDetector, SentenceBoundaryDetector, SentenceSpan, Word};

use crate::common;

const SEEDS: std::ops::Range<u64> = 0..25;

fn tokens_of(captions: &[Caption]) -> Vec<String> {
    captions
        .iter()
        .flat_map(|c| c.text().split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

fn assert_limits(captions: &[Caption], constraints: &CaptionConstraints, seed: u64) {
    for caption in captions {
        assert!(caption.end >= caption.start, "seed {}: caption ends before it starts", seed);
        assert!(
            caption.lines.len() <= constraints.max_lines_per_caption,
            "seed {}: {:?} has too many lines",
            seed,
            caption.lines
        );

        if caption.word_count < 2 {
            continue;
        }

        let chars = caption.lines.join(" ").chars().count();
        let duration = caption.duration();
        assert!(chars <= constraints.max_total_chars(), "seed {}: {} chars", seed, chars);
        assert!(duration <= constraints.max_duration_secs, "seed {}: {}s", seed, duration);
        if duration > 0.0 {
            assert!(chars as f64 / duration <= constraints.max_cps, "seed {}: too fast", seed);
        }
    }
}

/// Test that every word appears exactly once, in order, across the captions
#[test]
fn test_generateCaptions_withGeneratedWords_shouldCoverEveryWordOnce() {
    let detector = PunctuationBoundaryDetector::new();
    let constraints = CaptionConstraints::default();

    for seed in SEEDS {
        let words = common::generate_words(200, seed);
        let captions = generate_captions(&words, &detector, &constraints);

        let expected: Vec<String> = words.iter().map(|w| w.token().to_string()).collect();
        assert_eq!(tokens_of(&captions), expected, "seed {}", seed);
        assert_eq!(captions.iter().map(|c| c.word_count).sum::<usize>(), words.len());

        for pair in captions.windows(2) {
            assert!(pair[0].start <= pair[1].start, "seed {}: captions out of order", seed);
        }
    }
}

/// Test that multi-word captions respect length, duration and reading speed
#[test]
fn test_generateCaptions_withDefaultLimits_shouldRespectConstraints() {
    let detector = PunctuationBoundaryDetector::new();
    let constraints = CaptionConstraints::default();

    for seed in SEEDS {
        let words = common::generate_words(200, seed);
        let captions = generate_captions(&words, &detector, &constraints);
        assert_limits(&captions, &constraints, seed);
    }
}

/// Test regeneration with tighter limits
#[test]
fn test_generateCaptions_withSingleLineLimits_shouldEmitOneLineEach() {
    let detector = PunctuationBoundaryDetector::new();
    let constraints = CaptionConstraints {
        max_chars_per_line: 32,
        max_lines_per_caption: 1,
        max_duration_secs: 3.0,
        max_cps: 15.0,
        max_pause_secs: Some(0.5),
    };

    for seed in SEEDS {
        let words = common::generate_words(150, seed);
        let captions = generate_captions(&words, &detector, &constraints);

        assert_limits(&captions, &constraints, seed);
        assert!(captions.iter().all(|c| c.lines.len() == 1), "seed {}", seed);
    }
}

/// Test that a long pause between sentences never ends up inside a caption
#[test]
fn test_generateCaptions_withSentencePerWord_shouldBreakOnLongPauses() {
    let constraints = CaptionConstraints::default();
    let max_pause = 0.5;

    for seed in SEEDS {
        let words = common::generate_words(120, seed);

        let mut spans = Vec::with_capacity(words.len());
        let mut offset = 0;
        for word in &words {
            let len = word.token().len();
            spans.push(SentenceSpan::new(offset, offset + len));
            offset += len + 1;
        }
        let detector = move |_: &str| spans.clone();

        let captions = generate_captions(&words, &detector, &constraints);

        let mut caption_of_word = Vec::with_capacity(words.len());
        for (index, caption) in captions.iter().enumerate() {
            caption_of_word.extend(std::iter::repeat_n(index, caption.word_count));
        }

        for i in 1..words.len() {
            if words[i].start - words[i - 1].end > max_pause {
                assert_ne!(
                    caption_of_word[i],
                    caption_of_word[i - 1],
                    "seed {}: pause before word {} was merged",
                    seed,
                    i
                );
            }
        }
    }
}

/// Test that a detector returning nothing still yields full coverage
#[test]
fn test_generateCaptions_withSilentDetector_shouldStillCoverWords() {
    let detector = |_: &str| Vec::<SentenceSpan>::new();
    let words = common::generate_words(60, 7);

    let captions = generate_captions(&words, &detector, &CaptionConstraints::default());

    let expected: Vec<String> = words.iter().map(|w| w.token().to_string()).collect();
    assert_eq!(tokens_of(&captions), expected);
}

/// Test that the boundary detector is an open seam
#[test]
fn test_generateCaptions_withCustomDetectorType_shouldUseIt() {
    struct EveryTwoWords;

    impl SentenceBoundaryDetector for EveryTwoWords {
        fn segment(&self, text: &str) -> Vec<SentenceSpan> {
            let mut spans = Vec::new();
            let mut start = 0;
            let mut seen = 0;
            for (i, c) in text.char_indices() {
                if c == ' ' {
                    seen += 1;
                    if seen % 2 == 0 {
                        spans.push(SentenceSpan::new(start, i));
                        start = i + 1;
                    }
                }
            }
            spans.push(SentenceSpan::new(start, text.len()));
            spans
        }
    }

    let words: Vec<Word> = (0..6)
        .map(|i| Word::new("word", i as f64 * 2.0, i as f64 * 2.0 + 0.5, 0.9))
        .collect();

    // 1.5 s gaps between every word, so every sentence boundary is also a pause
    let captions = generate_captions(&words, &EveryTwoWords, &CaptionConstraints::default());

    assert_eq!(captions.len(), 3);
    assert!(captions.iter().all(|c| c.word_count == 2));
}
