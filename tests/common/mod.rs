/*!
 * Common test utilities for the captionforge test suite
 */

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use captionforge::app_config::Config;
use captionforge::app_controller::Controller;
use captionforge::style::FontCatalog;
use captionforge::transcript::Word;

/// Route library logs through the test harness, once per binary
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Two short sentences with a 0.6 s pause between them
pub const SAMPLE_WORDS_JSON: &str = r#"[
    {"text": "Hello", "start": 0.0, "end": 0.4, "probability": 0.9},
    {"text": "world.", "start": 0.4, "end": 0.9, "probability": 0.95},
    {"text": "This", "start": 1.5, "end": 1.8, "probability": 0.8},
    {"text": "is", "start": 1.8, "end": 2.0, "probability": 0.9},
    {"text": "a", "start": 2.0, "end": 2.1, "probability": 0.85},
    {"text": "test.", "start": 2.1, "end": 2.6, "probability": 0.9}
]"#;

/// Creates a sample word stream file
pub fn create_sample_words(dir: &Path, stem: &str) -> Result<PathBuf> {
    create_test_file(dir, &format!("{}.words.json", stem), SAMPLE_WORDS_JSON)
}

/// Seeded word stream: varied token lengths, gaps and the odd sentence end
pub fn generate_words(count: usize, seed: u64) -> Vec<Word> {
    const TOKENS: [&str; 12] = [
        "the", "caption", "speaker", "said", "extraordinarily", "we", "go", "now", "interesting",
        "and", "subtitles", "a",
    ];

    let mut rng = StdRng::seed_from_u64(seed);
    let mut words = Vec::with_capacity(count);
    let mut time = 0.0;

    for _ in 0..count {
        let token = TOKENS.choose(&mut rng).copied().unwrap_or("the");
        let text = if rng.random_bool(1.0 / 7.0) { format!("{}.", token) } else { token.to_string() };

        time += rng.random_range(0..9) as f64 * 0.1;
        let length = 0.1 + rng.random_range(0..6) as f64 * 0.1;
        let probability = rng.random_range(0.5..1.0);

        words.push(Word::new(text, time, time + length, probability));
        time += length;
    }

    words
}

/// Controller with a fixed font catalog and no saved global style
pub fn test_controller(config: Config) -> Result<Controller> {
    Ok(Controller::with_config(config)?
        .with_font_catalog(FontCatalog::from_families(["Cairo", "Noto Sans Arabic"]))
        .with_global_style_path(None))
}
