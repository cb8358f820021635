/*!
 * Packing sentences into caption cues.
 *
 * Greedy accumulate-then-flush: each sentence is tentatively appended to the
 * pending words and the merged run is measured. When the merge would break a
 * constraint, the run as it stood *before* the merge is finalized, so cue
 * boundaries follow sentence boundaries whenever possible. A run also has to
 * wrap into the allowed lines without overflowing one. Runs that are
 * oversized on their own are split from the back, keeping the longest prefix
 * that fits and always taking at least one word.
 */

use log::{debug, warn};

use super::{Caption, CaptionConstraints, LineFormatter};
use crate::transcript::{Sentence, Word, join_words};

/// Text length, duration and reading speed of a word run
#[derive(Debug, Clone, Copy)]
struct RunMeasure {
    chars: usize,
    duration: f64,
}

impl RunMeasure {
    fn of<'a, I>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Word>,
    {
        let mut iter = words.into_iter();
        let first = iter.next()?;
        let mut chars = first.token().chars().count();
        let mut last_end = first.end;

        for word in iter {
            chars += 1 + word.token().chars().count();
            last_end = word.end;
        }

        Some(Self {
            chars,
            duration: last_end - first.start,
        })
    }

    /// Characters per second, zero when the run has no duration
    fn cps(&self) -> f64 {
        if self.duration > 0.0 {
            self.chars as f64 / self.duration
        } else {
            0.0
        }
    }
}

/// Packs sentences into constrained captions
#[derive(Debug, Clone)]
pub struct CaptionGrouper {
    constraints: CaptionConstraints,
    formatter: LineFormatter,
}

impl CaptionGrouper {
    pub fn new(constraints: CaptionConstraints) -> Self {
        let formatter = LineFormatter::new(constraints.max_chars_per_line);
        Self { constraints, formatter }
    }

    pub fn constraints(&self) -> &CaptionConstraints {
        &self.constraints
    }

    /// Group sentences into captions covering every word exactly once, in order
    pub fn group(&self, sentences: &[Sentence]) -> Vec<Caption> {
        let mut captions = Vec::new();
        let mut pending: Vec<&Word> = Vec::new();

        for sentence in sentences {
            if !pending.is_empty() && self.merge_breaks_constraints(&pending, sentence) {
                self.flush(&mut pending, &mut captions);
            }
            pending.extend(sentence.words.iter());
        }

        self.flush(&mut pending, &mut captions);

        debug!(
            "Grouped {} sentences into {} captions",
            sentences.len(),
            captions.len()
        );
        captions
    }

    /// Whether appending `sentence` to the pending run would violate a limit
    fn merge_breaks_constraints(&self, pending: &[&Word], sentence: &Sentence) -> bool {
        let merged: Vec<&Word> = pending.iter().copied().chain(sentence.words.iter()).collect();
        if self.breaks_limits(&merged) {
            return true;
        }

        match (self.constraints.max_pause_secs, pending.last(), sentence.words.first()) {
            (Some(max_pause), Some(last), Some(next)) => next.start - last.end > max_pause,
            _ => false,
        }
    }

    fn breaks_limits(&self, words: &[&Word]) -> bool {
        match RunMeasure::of(words.iter().copied()) {
            Some(measure) => self.exceeds(&measure) || !self.fits_lines(words),
            None => false,
        }
    }

    fn exceeds(&self, measure: &RunMeasure) -> bool {
        measure.chars > self.constraints.max_total_chars()
            || measure.duration > self.constraints.max_duration_secs
            || measure.cps() > self.constraints.max_cps
    }

    /// Whether the run wraps without an overflowing line; a lone word always passes
    fn fits_lines(&self, words: &[&Word]) -> bool {
        words.len() <= 1
            || self
                .formatter
                .fits(&join_words(words.iter().copied()), self.constraints.max_lines_per_caption)
    }

    /// Finalize the pending run, splitting it while it is oversized
    fn flush(&self, pending: &mut Vec<&Word>, captions: &mut Vec<Caption>) {
        let words = std::mem::take(pending);
        let mut rest: &[&Word] = &words;

        while rest.len() > 1 {
            if !self.breaks_limits(rest) {
                break;
            }

            let split = match self.longest_fitting_prefix(rest) {
                Some(split) => split,
                None => {
                    warn!(
                        "Word '{}' at {:.2}s cannot fit caption limits, emitting it on its own",
                        rest[0].token(),
                        rest[0].start
                    );
                    1
                }
            };

            captions.push(self.build_caption(&rest[..split]));
            rest = &rest[split..];
        }

        if !rest.is_empty() {
            captions.push(self.build_caption(rest));
        }
    }

    /// Length of the longest proper prefix of `words` that satisfies every limit
    fn longest_fitting_prefix(&self, words: &[&Word]) -> Option<usize> {
        let first_start = words.first()?.start;
        let mut chars = 0;
        let mut best = None;

        for (i, word) in words.iter().enumerate().take(words.len() - 1) {
            if i > 0 {
                chars += 1;
            }
            chars += word.token().chars().count();

            let measure = RunMeasure {
                chars,
                duration: word.end - first_start,
            };

            // Length, duration and wrapped line count only grow with the prefix
            if measure.chars > self.constraints.max_total_chars()
                || measure.duration > self.constraints.max_duration_secs
                || !self.fits_lines(&words[..=i])
            {
                break;
            }

            if measure.cps() <= self.constraints.max_cps {
                best = Some(i + 1);
            }
        }

        best
    }

    fn build_caption(&self, words: &[&Word]) -> Caption {
        let text = join_words(words.iter().copied());
        let confidence = if words.is_empty() {
            crate::transcript::DEFAULT_WORD_PROBABILITY
        } else {
            words.iter().map(|w| w.confidence()).sum::<f64>() / words.len() as f64
        };

        Caption {
            start: words.first().map_or(0.0, |w| w.start),
            end: words.last().map_or(0.0, |w| w.end),
            lines: self.formatter.format(&text),
            confidence,
            word_count: words.len(),
        }
    }
}
