/*!
 * # captionforge - styled subtitles from word timings
 *
 * A Rust library that turns word-level speech timings into readable captions
 * and renders them as Advanced SubStation Alpha documents.
 *
 * ## Features
 *
 * - Sentence segmentation over a pluggable boundary detector
 * - Caption grouping under line length, line count, duration, reading speed
 *   and pause limits
 * - Balanced two-line wrapping without cutting words
 * - Style resolution with font fallback, color conversion and legacy
 *   alignment mapping
 * - Byte-stable ASS emission with right-to-left embedding, plus SRT export
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: Words, sentences and the sentence segmenter
 * - `captions`: Caption constraints, the grouper and the line formatter
 * - `style`: Style configuration, colors, fonts and the style resolver
 * - `timecode`: `H:MM:SS.cc` time codes
 * - `ass_document`: Subtitle document emission
 * - `caption_track`: Saved caption lists and SRT export
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod ass_document;
pub mod caption_track;
pub mod captions;
pub mod errors;
pub mod file_utils;
pub mod style;
pub mod timecode;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use ass_document::SubtitleDocument;
pub use captions::{Caption, CaptionConstraints, CaptionRecord, generate_captions};
pub use errors::{AppError, TimecodeError, TranscriptError};
pub use style::{ResolvedStyle, StyleConfig, StyleResolver};
pub use transcript::{PunctuationBoundaryDetector, SentenceBoundaryDetector, Word};
