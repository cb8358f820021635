// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use captionforge::app_config::{self, Config};
use captionforge::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build captions and a styled subtitle document from word timings
    Build {
        /// Word stream file or directory of *.words.json files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Directory for generated files (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Regenerate the caption list only, optionally with other limits
    Captions {
        /// Word stream file
        #[arg(value_name = "WORDS_JSON")]
        words_json: PathBuf,

        /// Characters allowed on one line
        #[arg(long)]
        max_chars_per_line: Option<usize>,

        /// Lines per caption (1 or 2)
        #[arg(long)]
        max_lines: Option<usize>,

        /// Longest time a caption stays on screen, in seconds
        #[arg(long)]
        max_duration: Option<f64>,

        /// Reading speed limit in characters per second
        #[arg(long)]
        max_cps: Option<f64>,

        /// Directory for the caption list (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Render a saved caption list into a subtitle document
    Render {
        /// Caption list file
        #[arg(value_name = "CAPTIONS_JSON")]
        captions_json: PathBuf,

        /// Style file overriding the saved and configured styles
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Directory for the document (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List installed font families and weights
    Fonts,

    /// Generate shell completions for captionforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// captionforge - styled subtitles from word timings
///
/// Groups recognizer word timings into readable captions and renders them as
/// an Advanced SubStation Alpha document.
#[derive(Parser, Debug)]
#[command(name = "captionforge")]
#[command(version)]
#[command(about = "Styled subtitle documents from word-level timings")]
#[command(long_about = "captionforge groups word-level speech timings into captions and renders them as styled ASS subtitles.

EXAMPLES:
    captionforge build talk.words.json                  # Captions and subtitles for one file
    captionforge -f build recordings/                   # Rebuild every *.words.json below a folder
    captionforge captions talk.words.json --max-lines 1 # Regenerate captions with other limits
    captionforge render talk.captions.json -s brand.json
    captionforge fonts                                  # Installed font families
    captionforge completions bash > captionforge.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Lowered to the configured level once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "captionforge", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Commands::Captions {
        max_chars_per_line,
        max_lines,
        max_duration,
        max_cps,
        ..
    } = &cli.command
    {
        apply_caption_overrides(&mut config, *max_chars_per_line, *max_lines, *max_duration, *max_cps);
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Build { input_path, output_dir } => {
            if input_path.is_file() {
                let output_dir = resolve_output_dir(&controller, output_dir, &input_path);
                controller.run(input_path, output_dir, cli.force).await?;
            } else if input_path.is_dir() {
                controller.run_folder(input_path, output_dir, cli.force).await?;
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", input_path));
            }
        }
        Commands::Captions { words_json, output_dir, .. } => {
            let output_dir = resolve_output_dir(&controller, output_dir, &words_json);
            controller
                .generate_caption_track(&words_json, &output_dir, cli.force)
                .await?;
        }
        Commands::Render {
            captions_json,
            style,
            output_dir,
        } => {
            if !captions_json.is_file() {
                return Err(anyhow!("Caption file does not exist: {:?}", captions_json));
            }
            let output_dir = resolve_output_dir(&controller, output_dir, &captions_json);
            controller.render(&captions_json, &output_dir, style.as_deref(), cli.force)?;
        }
        Commands::Fonts => {
            let fonts = controller.list_fonts();
            if fonts.is_empty() {
                warn!("No fonts found in {:?}", controller.config().fonts.font_dirs);
            }
            let mut stdout = std::io::stdout();
            for face in fonts {
                writeln!(stdout, "{}\t{}", face.family, face.weight)?;
            }
        }
        Commands::Completions { .. } => {}
    }

    info!("Done.");
    Ok(())
}

fn apply_caption_overrides(
    config: &mut Config,
    max_chars_per_line: Option<usize>,
    max_lines: Option<usize>,
    max_duration: Option<f64>,
    max_cps: Option<f64>,
) {
    if let Some(chars) = max_chars_per_line {
        config.caption.max_chars_per_line = chars;
    }
    if let Some(lines) = max_lines {
        config.caption.max_lines_per_caption = lines;
    }
    if let Some(duration) = max_duration {
        config.caption.max_caption_duration_secs = duration;
    }
    if let Some(cps) = max_cps {
        config.caption.max_cps = cps;
    }
}

// CLI flag, then the configured output directory, then the input's directory
fn resolve_output_dir(controller: &Controller, cli_dir: Option<PathBuf>, input: &Path) -> PathBuf {
    cli_dir
        .or_else(|| controller.config().output.output_dir.clone())
        .unwrap_or_else(|| parent_dir(input))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf()
}
