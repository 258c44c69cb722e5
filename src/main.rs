// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use dualsub::app_config::{self, Config};
use dualsub::app_controller::{Controller, GenerationOutcome, GenerationRequest};
use dualsub::generation::{GeneratorConfig, GeneratorOverrides};
use dualsub::subtitle_processor::SubtitleFormat;

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleFormat {
    Srt,
    Vtt,
    Json,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
            CliSubtitleFormat::Vtt => SubtitleFormat::Vtt,
            CliSubtitleFormat::Json => SubtitleFormat::Json,
        }
    }
}

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
    /// Generate bilingual subtitles from two transcripts
    Generate(GenerateArgs),

    /// Parse a subtitle file and check its timing
    Check(CheckArgs),

    /// Write a default configuration file
    InitConfig {
        /// Where to write the configuration
        #[arg(value_name = "PATH", default_value = "dualsub.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Generate shell completions for dualsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source-language transcript
    #[arg(value_name = "SOURCE_TEXT")]
    source_path: PathBuf,

    /// Target-language transcript
    #[arg(value_name = "TARGET_TEXT")]
    target_path: PathBuf,

    /// Video length in seconds (0 = unknown)
    #[arg(short = 'd', long, default_value_t = 0.0)]
    video_duration: f64,

    /// Output file (defaults to the source path with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliSubtitleFormat>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    tuning: TuningArgs,
}

/// Generator thresholds; each one overrides the config file
#[derive(Args, Debug, Default)]
struct TuningArgs {
    /// Merge fragments shorter than this many characters
    #[arg(long)]
    min_chars_per_fragment: Option<usize>,

    /// Split fragments longer than this many characters
    #[arg(long)]
    max_chars_per_line: Option<usize>,

    /// Reading speed in characters per second
    #[arg(long)]
    chars_per_second: Option<f64>,

    /// Seconds added to every duration estimate
    #[arg(long)]
    base_entry_pause: Option<f64>,

    /// Shortest estimated cue in seconds
    #[arg(long)]
    min_duration: Option<f64>,

    /// Longest estimated cue in seconds
    #[arg(long)]
    max_duration: Option<f64>,

    /// Gap between cues in seconds
    #[arg(long)]
    cue_gap: Option<f64>,
}

impl From<TuningArgs> for GeneratorOverrides {
    fn from(args: TuningArgs) -> Self {
        Self {
            min_chars_per_fragment: args.min_chars_per_fragment,
            max_chars_per_line: args.max_chars_per_line,
            chars_per_second: args.chars_per_second,
            base_entry_pause: args.base_entry_pause,
            min_duration: args.min_duration,
            max_duration: args.max_duration,
            cue_gap: args.cue_gap,
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Subtitle file to check (.srt, .vtt or .json)
    #[arg(value_name = "SUBTITLE_FILE")]
    path: PathBuf,

    /// Video length in seconds (0 = unknown)
    #[arg(short = 'd', long, default_value_t = 0.0)]
    video_duration: f64,
}

/// dualsub - bilingual subtitle generator
///
/// Builds timed bilingual cues from a lesson transcript and its translation.
#[derive(Parser, Debug)]
#[command(name = "dualsub")]
#[command(version)]
#[command(about = "Bilingual subtitle cue generator")]
#[command(long_about = "dualsub splits a transcript and its translation into sentence fragments, pairs them by position and lays them out as timed bilingual cues.

EXAMPLES:
    dualsub generate lesson.en.txt lesson.vi.txt              # Timing from text length only
    dualsub generate lesson.en.txt lesson.vi.txt -d 312.5     # Fit cues to a 312.5s video
    dualsub generate en.txt vi.txt -o out.vtt                 # Format taken from the extension
    dualsub generate en.txt vi.txt --cue-gap 0.2 -f           # Override a threshold, overwrite output
    dualsub check lesson.en.srt -d 312.5                      # Validate an existing file
    dualsub init-config                                       # Write dualsub.json with defaults
    dualsub completions bash > dualsub.bash                   # Generate bash completions

CONFIGURATION:
    Settings are read from dualsub.json when present. Use --config-path to point
    elsewhere. Command line flags override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "dualsub.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dualsub", &mut std::io::stdout());
            Ok(())
        }
        Commands::InitConfig { path, force_overwrite } => run_init_config(&path, force_overwrite),
        Commands::Generate(args) => {
            let controller = build_controller(&cli.config_path, cli.log_level.is_some())?;
            run_generate(&controller, args)
        }
        Commands::Check(args) => {
            let controller = build_controller(&cli.config_path, cli.log_level.is_some())?;
            run_check(&controller, args)
        }
    }
}

fn build_controller(config_path: &Path, log_level_from_cli: bool) -> Result<Controller> {
    if !config_path.exists() {
        info!("No config file at {:?}, using defaults", config_path);
    }
    let config = Config::load_or_default(config_path)?;

    // If log level was not set via command line, update it from config now
    if !log_level_from_cli {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Controller::with_config(config)
}

fn run_generate(controller: &Controller, args: GenerateArgs) -> Result<()> {
    let request = GenerationRequest {
        source_path: args.source_path,
        target_path: args.target_path,
        video_duration: args.video_duration,
        output_path: args.output,
        format: args.format.map(Into::into),
        overrides: args.tuning.into(),
        force_overwrite: args.force_overwrite,
    };

    match controller.generate(&request)? {
        GenerationOutcome::Written { output_path, cue_count, validation } => {
            info!("Success: {} cues -> {:?}", cue_count, output_path);
            if let Some(result) = validation {
                if !result.passed {
                    warn!("Output written, but {} cue(s) failed timing checks", result.failed_entries().len());
                }
            }
        }
        GenerationOutcome::Skipped { output_path } => {
            info!("Nothing written, {:?} already exists", output_path);
        }
    }

    Ok(())
}

fn run_check(controller: &Controller, args: CheckArgs) -> Result<()> {
    let result = controller.check(&args.path, args.video_duration)?;

    if result.passed {
        info!("{:?}: {} cues, timing OK", args.path, result.entry_results.len());
        Ok(())
    } else {
        Err(anyhow!(
            "{:?}: {} of {} cues failed timing checks",
            args.path,
            result.failed_entries().len(),
            result.entry_results.len()
        ))
    }
}

fn run_init_config(path: &Path, force_overwrite: bool) -> Result<()> {
    if path.exists() && !force_overwrite {
        warn!("Config file already exists: {:?}. Use -f to force overwrite.", path);
        return Ok(());
    }

    // Spell out every threshold so the file is easy to edit
    let config = Config {
        generator: GeneratorOverrides::from(&GeneratorConfig::default()),
        ..Default::default()
    };
    config.save(path)?;
    info!("Wrote default configuration to {:?}", path);
    Ok(())
}
