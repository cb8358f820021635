/*!
 * Two-line caption wrapping.
 *
 * Text that fits on one line is returned unchanged. Otherwise every word
 * boundary is tried and the split is scored as `(top_heavy_penalty,
 * length_difference)`: top-heavy layouts (inverted pyramid) win first, then
 * the most balanced one. Ties keep the earliest split.
 */

use log::debug;

/// Wraps caption text into at most two lines
#[derive(Debug, Clone)]
pub struct LineFormatter {
    max_chars_per_line: usize,
}

impl LineFormatter {
    pub fn new(max_chars_per_line: usize) -> Self {
        Self {
            max_chars_per_line: max_chars_per_line.max(1),
        }
    }

    pub fn max_chars_per_line(&self) -> usize {
        self.max_chars_per_line
    }

    /// Format `text` into one or two lines
    pub fn format(&self, text: &str) -> Vec<String> {
        if text.chars().count() <= self.max_chars_per_line {
            return vec![text.to_string()];
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        match self.best_split(&words) {
            Some(split) => vec![words[..split].join(" "), words[split..].join(" ")],
            None => {
                debug!("No balanced split within {} chars, hard wrapping", self.max_chars_per_line);
                self.hard_wrap(text)
            }
        }
    }

    /// Whether `text` lays out within `max_lines` lines without overflowing one
    pub fn fits(&self, text: &str, max_lines: usize) -> bool {
        if text.chars().count() <= self.max_chars_per_line {
            return true;
        }
        if max_lines < 2 {
            return false;
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        self.best_split(&words).is_some()
    }

    /// Word index of the best-scoring split, if any keeps both lines within the limit
    fn best_split(&self, words: &[&str]) -> Option<usize> {
        let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
        let total: usize = lengths.iter().sum::<usize>() + lengths.len().saturating_sub(1);

        let mut best: Option<((u8, usize), usize)> = None;
        let mut line1 = 0;

        for split in 1..words.len() {
            line1 += lengths[split - 1] + usize::from(split > 1);
            let line2 = total - line1 - 1;

            if line1 > self.max_chars_per_line {
                break;
            }
            if line2 > self.max_chars_per_line {
                continue;
            }

            let top_heavy_penalty = if line1 > line2 { 0 } else { 1 };
            let score = (top_heavy_penalty, line1.abs_diff(line2));

            if best.is_none_or(|(best_score, _)| score < best_score) {
                best = Some((score, split));
            }
        }

        best.map(|(_, split)| split)
    }

    /// Break at the last space before the limit.
    ///
    /// A first token longer than the limit is kept whole on the first line, and
    /// text without any space stays on a single overflowing line.
    fn hard_wrap(&self, text: &str) -> Vec<String> {
        let limit = text
            .char_indices()
            .nth(self.max_chars_per_line)
            .map_or(text.len(), |(i, _)| i);

        let cut = match text[..limit].rfind(' ') {
            Some(i) if i > 0 => Some(i),
            _ => text[limit..].find(' ').map(|i| limit + i),
        };

        match cut {
            Some(i) => {
                let rest = text[i..].trim();
                if rest.is_empty() {
                    vec![text[..i].trim_end().to_string()]
                } else {
                    vec![text[..i].trim_end().to_string(), rest.to_string()]
                }
            }
            None => vec![text.to_string()],
        }
    }
}
