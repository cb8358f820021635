use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::style::StyleConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Caption packing limits
    #[serde(default)]
    pub caption: CaptionConfig,

    /// Style used when no style file is given
    #[serde(default)]
    pub style: StyleConfig,

    /// Font lookup
    #[serde(default)]
    pub fonts: FontConfig,

    /// Output options
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Caption grouping configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionConfig {
    // @field: Characters allowed on one line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    // @field: Lines per caption (1 or 2)
    #[serde(default = "default_max_lines_per_caption")]
    pub max_lines_per_caption: usize,

    // @field: Longest time a caption stays on screen
    #[serde(default = "default_max_caption_duration_secs")]
    pub max_caption_duration_secs: f64,

    // @field: Reading speed limit in characters per second
    #[serde(default = "default_max_cps")]
    pub max_cps: f64,

    // @field: Silence that always starts a new caption, on top of the three limits above; null to disable
    #[serde(default = "default_max_pause_secs")]
    pub max_pause_secs: Option<f64>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            max_lines_per_caption: default_max_lines_per_caption(),
            max_caption_duration_secs: default_max_caption_duration_secs(),
            max_cps: default_max_cps(),
            max_pause_secs: default_max_pause_secs(),
        }
    }
}

impl CaptionConfig {
    /// Total characters a caption may hold
    pub fn max_total_chars(&self) -> usize {
        self.max_chars_per_line * self.max_lines_per_caption
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chars_per_line == 0 {
            return Err(anyhow!("max_chars_per_line must be greater than 0"));
        }
        if !(1..=2).contains(&self.max_lines_per_caption) {
            return Err(anyhow!(
                "max_lines_per_caption must be 1 or 2, got {}",
                self.max_lines_per_caption
            ));
        }
        if !(self.max_caption_duration_secs.is_finite() && self.max_caption_duration_secs > 0.0) {
            return Err(anyhow!(
                "max_caption_duration_secs must be positive, got {}",
                self.max_caption_duration_secs
            ));
        }
        if !(self.max_cps.is_finite() && self.max_cps > 0.0) {
            return Err(anyhow!("max_cps must be positive, got {}", self.max_cps));
        }
        if let Some(pause) = self.max_pause_secs {
            if !(pause.is_finite() && pause >= 0.0) {
                return Err(anyhow!("max_pause_secs must be non-negative, got {}", pause));
            }
        }
        Ok(())
    }
}

/// Font lookup configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FontConfig {
    // @field: Directories whose subdirectories name installed families
    #[serde(default = "default_font_dirs")]
    pub font_dirs: Vec<PathBuf>,

    // @field: Family used when the requested one is not installed
    #[serde(default = "default_fallback_family")]
    pub fallback_family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_dirs: default_font_dirs(),
            fallback_family: default_fallback_family(),
        }
    }
}

/// Output file configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    /// Also export SRT next to the ASS document
    #[serde(default)]
    pub write_srt: bool,

    /// Output directory, defaults to the input file's directory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_chars_per_line() -> usize {
    42
}

fn default_max_lines_per_caption() -> usize {
    2
}

fn default_max_caption_duration_secs() -> f64 {
    7.0
}

fn default_max_cps() -> f64 {
    21.0
}

fn default_max_pause_secs() -> Option<f64> {
    Some(0.5)
}

fn default_font_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("assets/fonts"),
        PathBuf::from("/usr/share/fonts/truetype/custom"),
    ]
}

fn default_fallback_family() -> String {
    "Noto Sans Arabic".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration, writing a default file first when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize default config to JSON")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.caption.validate().context("Invalid caption configuration")?;

        if self.fonts.fallback_family.trim().is_empty() {
            return Err(anyhow!("Fallback font family cannot be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            caption: CaptionConfig::default(),
            style: StyleConfig::default(),
            fonts: FontConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
