use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};

use crate::captions::{Caption, CaptionRecord};
use crate::file_utils::FileManager;

// @module: Persisted caption lists and SRT export

// @struct: One numbered SRT cue
#[derive(Debug, Clone, PartialEq)]
pub struct SrtEntry {
    // @field: Sequence number, starting at 1
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Cue text
    pub text: String,
}

impl SrtEntry {
    // @param record: Caption to export
    // @returns: Entry with millisecond timing, translation preferred
    pub fn from_record(seq_num: usize, record: &CaptionRecord) -> Self {
        Self {
            seq_num,
            start_time_ms: seconds_to_ms(record.start_time),
            end_time_ms: seconds_to_ms(record.end_time),
            text: record.display_text().trim().to_string(),
        }
    }

    /// Format milliseconds as `HH:MM:SS,mmm`
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SrtEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Ordered caption list with the file it was loaded from
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    /// Source filename
    pub source_file: PathBuf,

    /// Captions in display order
    pub records: Vec<CaptionRecord>,
}

impl CaptionTrack {
    pub fn new(source_file: PathBuf, records: Vec<CaptionRecord>) -> Self {
        Self { source_file, records }
    }

    /// Wrap freshly generated captions
    pub fn from_captions(source_file: PathBuf, captions: &[Caption]) -> Self {
        Self::new(source_file, captions.iter().map(CaptionRecord::from).collect())
    }

    /// Load a caption list saved as a JSON array of records
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("Caption file does not exist: {}", path.display()));
        }

        let content = FileManager::read_to_string(path)?;
        let records: Vec<CaptionRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse caption file: {}", path.display()))?;

        if records.is_empty() {
            warn!("Caption file {} contains no captions", path.display());
        }

        for (i, record) in records.iter().enumerate() {
            if record.end_time < record.start_time {
                return Err(anyhow!(
                    "Caption {} in {} ends ({}) before it starts ({})",
                    i,
                    path.display(),
                    record.end_time,
                    record.start_time
                ));
            }
        }

        debug!("Loaded {} captions from {}", records.len(), path.display());
        Ok(Self::new(path.to_path_buf(), records))
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records).context("Failed to serialize captions")
    }

    /// Save as JSON, replacing any existing file atomically
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_atomically(path, &self.to_json()?)
    }

    /// Numbered SRT cues, skipping captions without text
    pub fn srt_entries(&self) -> Vec<SrtEntry> {
        self.records
            .iter()
            .filter(|r| !r.display_text().trim().is_empty())
            .enumerate()
            .map(|(i, r)| SrtEntry::from_record(i + 1, r))
            .collect()
    }

    pub fn to_srt(&self) -> String {
        self.srt_entries().iter().map(ToString::to_string).collect()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_atomically(path, &self.to_srt())
    }
}
