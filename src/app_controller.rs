use anyhow::{Result, anyhow};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::generation::{GeneratorOverrides, SubtitleGenerator};
use crate::subtitle_processor::{CueCollection, SubtitleFormat};
use crate::validation::{CueValidationResult, CueValidator};

// @module: Application controller for subtitle generation

/// One generation job
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Source-language transcript
    pub source_path: PathBuf,
    /// Target-language transcript
    pub target_path: PathBuf,
    /// Video length in seconds, zero when unknown
    pub video_duration: f64,
    /// Explicit output file; derived from the source path when absent
    pub output_path: Option<PathBuf>,
    /// Output format; falls back to the output path's extension, then the config
    pub format: Option<SubtitleFormat>,
    /// Thresholds given on the command line, layered over the config file
    pub overrides: GeneratorOverrides,
    /// Overwrite an existing output file
    pub force_overwrite: bool,
}

impl GenerationRequest {
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(source_path: P1, target_path: P2) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            video_duration: 0.0,
            output_path: None,
            format: None,
            overrides: GeneratorOverrides::default(),
            force_overwrite: false,
        }
    }
}

/// What a generation job did
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// Cues were written to the file
    Written {
        output_path: PathBuf,
        cue_count: usize,
        validation: Option<CueValidationResult>,
    },
    /// Output already existed and overwriting was not requested
    Skipped { output_path: PathBuf },
}

/// Main application controller for subtitle generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read both transcripts, generate cues and write them out
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        let start_time = std::time::Instant::now();

        for path in [&request.source_path, &request.target_path] {
            if !FileManager::file_exists(path) {
                return Err(anyhow!("Input file does not exist: {:?}", path));
            }
            if FileManager::detect_file_type(path)? != FileType::Transcript {
                warn!("{:?} does not look like a plain-text transcript, reading it as text anyway", path);
            }
        }

        let format = self.resolve_format(request);
        let output_path = match &request.output_path {
            Some(path) => path.clone(),
            None => FileManager::generate_output_path(&request.source_path, None, format.extension()),
        };

        let force_overwrite = request.force_overwrite || self.config.output.force_overwrite;
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(GenerationOutcome::Skipped { output_path });
        }

        let generator_config = self
            .config
            .generator
            .merged_with(&request.overrides)
            .resolve();
        generator_config.validate()?;
        debug!("Generator settings: {:?}", generator_config);

        let source_text = FileManager::read_to_string(&request.source_path)?;
        let target_text = FileManager::read_to_string(&request.target_path)?;

        let generator = SubtitleGenerator::with_config(generator_config);
        let cues = generator.generate(&source_text, &target_text, request.video_duration);

        if cues.is_empty() {
            warn!("Transcripts produced no cues; writing an empty {} file", format);
        }

        let validation = if self.config.output.validate {
            let result = CueValidator::for_video(request.video_duration).validate_cues(&cues);
            Self::log_validation(&result);
            Some(result)
        } else {
            None
        };

        let collection = CueCollection::new(output_path.clone(), cues);
        collection.write_to_file(&output_path, format)?;

        info!(
            "Wrote {} cues to {:?} in {:.2?}",
            collection.cues.len(),
            output_path,
            start_time.elapsed()
        );

        Ok(GenerationOutcome::Written {
            output_path,
            cue_count: collection.cues.len(),
            validation,
        })
    }

    /// Parse an existing subtitle file and validate its timing
    pub fn check<P: AsRef<Path>>(&self, path: P, video_duration: f64) -> Result<CueValidationResult> {
        let path = path.as_ref();
        let collection = CueCollection::from_file(path)?;
        debug!("{}", collection);

        let result = CueValidator::for_video(video_duration).validate_cues(&collection.cues);
        Self::log_validation(&result);
        Ok(result)
    }

    fn resolve_format(&self, request: &GenerationRequest) -> SubtitleFormat {
        request
            .format
            .or_else(|| {
                request
                    .output_path
                    .as_ref()
                    .and_then(|path| SubtitleFormat::from_path(path).ok())
            })
            .unwrap_or(self.config.output.format)
    }

    fn log_validation(result: &CueValidationResult) {
        for entry in result.entries_with_issues() {
            for issue in &entry.issues {
                warn!("Cue {}: {}", entry.seq_num, issue);
            }
        }
        if result.passed {
            debug!("All {} cues passed timing checks", result.entry_results.len());
        } else {
            warn!(
                "{} of {} cues failed timing checks",
                result.failed_entries().len(),
                result.entry_results.len()
            );
        }
    }
}
