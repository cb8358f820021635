/*!
 * Error types for the captionforge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Styling problems are never errors: the style resolver recovers locally and logs.
 * Only structurally invalid word streams and malformed time codes are rejected.
 */

use thiserror::Error;

/// Errors raised when a word stream violates the caller contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// A word ends before it starts
    #[error("Word {index} has end time {end} before start time {start}")]
    InvalidTiming {
        /// Position of the word in the stream
        index: usize,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
    },

    /// A word carries a NaN or infinite timestamp
    #[error("Word {index} has a non-finite timestamp")]
    NonFiniteTime {
        /// Position of the word in the stream
        index: usize,
    },

    /// Recognition probability outside of [0, 1]
    #[error("Word {index} has probability {value} outside of [0, 1]")]
    InvalidProbability {
        /// Position of the word in the stream
        index: usize,
        /// Offending probability
        value: f64,
    },

    /// Start times must be monotonically non-decreasing
    #[error("Word {index} starts at {start} which is before the previous word ({previous_start})")]
    OutOfOrder {
        /// Position of the word in the stream
        index: usize,
        /// Start time of the previous word
        previous_start: f64,
        /// Start time of this word
        start: f64,
    },

    /// The input could not be decoded as a word stream
    #[error("Failed to parse word stream: {0}")]
    Parse(String),
}

/// Errors raised when decoding subtitle time codes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimecodeError {
    /// The string does not look like H:MM:SS.cc
    #[error("Invalid time code format: {0}")]
    InvalidFormat(String),

    /// A component is out of range (minutes/seconds >= 60, centiseconds >= 100)
    #[error("Time code component {component} out of range: {value}")]
    ComponentOutOfRange {
        /// Component name
        component: &'static str,
        /// Parsed value
        value: u64,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from word stream validation
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Error from time code decoding
    #[error("Time code error: {0}")]
    Timecode(#[from] TimecodeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
