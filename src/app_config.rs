/*!
 * Application configuration.
 *
 * Loading, validating and saving the `dualsub.json` settings file.
 */

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::file_utils::FileManager;
use crate::generation::{GeneratorConfig, GeneratorOverrides};
use crate::subtitle_processor::SubtitleFormat;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Generator thresholds; unset fields fall back to the built-in defaults
    #[serde(default)]
    pub generator: GeneratorOverrides,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Format written when none is given on the command line
    #[serde(default)]
    pub format: SubtitleFormat,

    // @field: Run timing validation after generating
    #[serde(default = "default_true")]
    pub validate: bool,

    // @field: Overwrite existing output files
    #[serde(default)]
    pub force_overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: SubtitleFormat::default(),
            validate: default_true(),
            force_overwrite: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
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
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load a configuration file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if FileManager::file_exists(&path) {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &json)
    }

    /// Generator thresholds with file overrides applied
    pub fn generator_config(&self) -> GeneratorConfig {
        self.generator.resolve()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.generator_config()
            .validate()
            .context("Invalid generator settings")?;
        Ok(())
    }
}
