use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::ass_document::SubtitleDocument;
use crate::caption_track::CaptionTrack;
use crate::captions::{Caption, CaptionConstraints, CaptionRecord, generate_captions};
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType, WORDS_SUFFIX};
use crate::style::{FontCatalog, FontFace, ResolvedStyle, StyleConfig, StyleResolver, list_fonts};
use crate::transcript::{PunctuationBoundaryDetector, SentenceBoundaryDetector, Word, parse_words_json, validate_words};

// @module: Application controller for caption generation and rendering

/// What happened to one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The file was (re)written
    Written(PathBuf),
    /// The rendered content matched the existing file
    Unchanged(PathBuf),
    /// An output already existed and overwriting was not forced
    Skipped(PathBuf),
}

impl ProcessOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Unchanged(path) | Self::Skipped(path) => path,
        }
    }
}

/// Counts reported after a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Sentence boundary detection, shared with caption workers
    detector: Arc<dyn SentenceBoundaryDetector>,

    // @field: Installed fonts, scanned once
    fonts: FontCatalog,

    // @field: Saved global style location
    global_style_path: Option<PathBuf>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let fonts = FontCatalog::scan(&config.fonts.font_dirs);
        if fonts.is_empty() {
            debug!("No installed font families found, every family will fall back to {}", config.fonts.fallback_family);
        }

        Ok(Self {
            config,
            detector: Arc::new(PunctuationBoundaryDetector::new()),
            fonts,
            global_style_path: StyleConfig::global_style_path(),
        })
    }

    /// Replace the sentence boundary detector
    pub fn with_detector(mut self, detector: Arc<dyn SentenceBoundaryDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the scanned font catalog
    pub fn with_font_catalog(mut self, fonts: FontCatalog) -> Self {
        self.fonts = fonts;
        self
    }

    /// Override where the saved global style is looked up, `None` to ignore it
    pub fn with_global_style_path(mut self, path: Option<PathBuf>) -> Self {
        self.global_style_path = path;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn constraints(&self) -> CaptionConstraints {
        CaptionConstraints::from(&self.config.caption)
    }

    /// Build captions with the configured limits
    pub async fn build_captions(&self, words: Vec<Word>) -> Result<Vec<Caption>> {
        self.build_captions_with(words, self.constraints()).await
    }

    /// Build captions with explicit limits.
    ///
    /// The word stream is validated first; the pipeline itself runs on a
    /// blocking worker so the async runtime is never stalled.
    pub async fn build_captions_with(&self, words: Vec<Word>, constraints: CaptionConstraints) -> Result<Vec<Caption>> {
        validate_words(&words).context("Invalid word stream")?;

        let detector = Arc::clone(&self.detector);
        let word_count = words.len();

        let captions = tokio::task::spawn_blocking(move || generate_captions(&words, detector.as_ref(), &constraints))
            .await
            .context("Caption worker failed")?;

        debug!("Built {} captions from {} words", captions.len(), word_count);
        Ok(captions)
    }

    /// Resolve a style against the installed fonts
    pub fn resolve_style(&self, style: &StyleConfig) -> ResolvedStyle {
        StyleResolver::new(&self.fonts, &self.config.fonts.fallback_family).resolve(style)
    }

    /// Style for a render request: explicit file, saved global style, then config
    pub fn load_style(&self, explicit: Option<&Path>) -> Result<StyleConfig> {
        StyleConfig::load_effective(explicit, self.global_style_path.as_deref(), &self.config.style)
    }

    /// Assemble a subtitle document from caption records
    pub fn render_document(&self, records: &[CaptionRecord], style: &StyleConfig) -> SubtitleDocument {
        SubtitleDocument::from_records(records, self.resolve_style(style))
    }

    /// Installed font faces
    pub fn list_fonts(&self) -> Vec<FontFace> {
        list_fonts(&self.config.fonts.font_dirs)
    }

    /// Write a document unless its content is already on disk
    pub fn write_document(&self, document: &SubtitleDocument, path: &Path) -> Result<ProcessOutcome> {
        let fingerprint = document.fingerprint();
        if FileManager::file_fingerprint(path)?.as_deref() == Some(fingerprint.as_str()) {
            debug!("Document unchanged, keeping {}", path.display());
            return Ok(ProcessOutcome::Unchanged(path.to_path_buf()));
        }

        FileManager::write_atomically(path, &document.render())?;
        Ok(ProcessOutcome::Written(path.to_path_buf()))
    }

    fn output_dir_for(&self, input_file: &Path) -> PathBuf {
        match &self.config.output.output_dir {
            Some(dir) => dir.clone(),
            None => input_file.parent().unwrap_or(Path::new(".")).to_path_buf(),
        }
    }

    fn read_words(input_file: &Path) -> Result<Vec<Word>, AppError> {
        let content = std::fs::read_to_string(input_file)?;
        Ok(parse_words_json(&content)?)
    }

    /// Turn a word stream file into a saved caption list
    pub async fn generate_caption_track(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<ProcessOutcome> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let captions_path = FileManager::generate_output_path(input_file, output_dir, "captions.json");
        if captions_path.exists() && !force_overwrite {
            warn!("Skipping file, captions already exist (use -f to force overwrite)");
            return Ok(ProcessOutcome::Skipped(captions_path));
        }

        let words = Self::read_words(input_file)
            .with_context(|| format!("Failed to read words from {}", input_file.display()))?;
        let captions = self.build_captions(words).await?;

        FileManager::ensure_dir(output_dir)?;
        CaptionTrack::from_captions(captions_path.clone(), &captions).save_json(&captions_path)?;
        info!("Wrote {} captions to {}", captions.len(), captions_path.display());

        Ok(ProcessOutcome::Written(captions_path))
    }

    /// Render a saved caption list into a subtitle document (and SRT when configured)
    pub fn render(
        &self,
        captions_file: &Path,
        output_dir: &Path,
        style_file: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<ProcessOutcome> {
        let ass_path = FileManager::generate_output_path(captions_file, output_dir, "ass");
        if ass_path.exists() && !force_overwrite {
            warn!("Skipping file, subtitle document already exists (use -f to force overwrite)");
            return Ok(ProcessOutcome::Skipped(ass_path));
        }

        let track = CaptionTrack::load_json(captions_file)?;
        let style = self.load_style(style_file)?;
        let document = self.render_document(&track.records, &style);
        let outcome = self.write_document(&document, &ass_path)?;

        if self.config.output.write_srt {
            let srt_path = FileManager::generate_output_path(captions_file, output_dir, "srt");
            track.write_to_srt(&srt_path)?;
            debug!("Wrote SRT export to {}", srt_path.display());
        }

        match &outcome {
            ProcessOutcome::Written(path) => info!("Success: {}", path.display()),
            ProcessOutcome::Unchanged(path) => info!("Up to date: {}", path.display()),
            ProcessOutcome::Skipped(_) => {}
        }
        Ok(outcome)
    }

    /// Run the main workflow: word stream to caption list to subtitle document
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<ProcessOutcome> {
        let start_time = std::time::Instant::now();

        match FileManager::detect_file_type(&input_file)? {
            FileType::CaptionList => {
                info!("Detected caption list, rendering directly");
                return self.render(&input_file, &output_dir, None, force_overwrite);
            }
            FileType::Unknown => debug!("Treating {:?} as a word stream", input_file),
            FileType::WordStream => {}
        }

        let captions_outcome = self.generate_caption_track(&input_file, &output_dir, force_overwrite).await?;
        if let ProcessOutcome::Skipped(_) = captions_outcome {
            return Ok(captions_outcome);
        }

        let outcome = self.render(captions_outcome.path(), &output_dir, None, true)?;

        info!("Captioning completed in {}.", Self::format_duration(start_time.elapsed()));
        Ok(outcome)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode, processing every word stream below a directory.
    /// A failing file is logged and counted; it does not stop the batch.
    /// `output_dir` overrides the configured or per-file output directory.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let word_files = FileManager::find_files(&input_dir, WORDS_SUFFIX)?;
        if word_files.is_empty() {
            return Err(anyhow!("No {} files found in directory: {:?}", WORDS_SUFFIX, input_dir));
        }

        let folder_pb = ProgressBar::new(word_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for word_file in &word_files {
            let file_name = word_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let file_output_dir = output_dir.clone().unwrap_or_else(|| self.output_dir_for(word_file));
            match self.run(word_file.clone(), file_output_dir, force_overwrite).await {
                Ok(ProcessOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }
}
