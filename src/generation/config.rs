/*!
 * Tunable thresholds for cue generation.
 *
 * `GeneratorConfig` is the fully resolved record the pipeline reads.
 * `GeneratorOverrides` carries a partial set of values (from a config file
 * or the command line) that is merged over the defaults.
 */

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Resolved generation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fragments shorter than this (in characters) are merged with a neighbour
    #[serde(default = "default_min_chars_per_fragment")]
    pub min_chars_per_fragment: usize,

    /// Fragments longer than this (in characters) are split once near the middle
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Reading speed used for the initial duration estimate
    #[serde(default = "default_chars_per_second")]
    pub chars_per_second: f64,

    /// Fixed time added to every estimate, in seconds
    #[serde(default = "default_base_entry_pause")]
    pub base_entry_pause: f64,

    /// Lower bound of the estimate, in seconds
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Upper bound of the estimate, in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,

    /// Silence between consecutive cues, in seconds
    #[serde(default = "default_cue_gap")]
    pub cue_gap: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_chars_per_fragment: default_min_chars_per_fragment(),
            max_chars_per_line: default_max_chars_per_line(),
            chars_per_second: default_chars_per_second(),
            base_entry_pause: default_base_entry_pause(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            cue_gap: default_cue_gap(),
        }
    }
}

impl GeneratorConfig {
    /// Return a copy with every `Some` field of `overrides` applied
    pub fn with_overrides(&self, overrides: &GeneratorOverrides) -> Self {
        Self {
            min_chars_per_fragment: overrides.min_chars_per_fragment.unwrap_or(self.min_chars_per_fragment),
            max_chars_per_line: overrides.max_chars_per_line.unwrap_or(self.max_chars_per_line),
            chars_per_second: overrides.chars_per_second.unwrap_or(self.chars_per_second),
            base_entry_pause: overrides.base_entry_pause.unwrap_or(self.base_entry_pause),
            min_duration: overrides.min_duration.unwrap_or(self.min_duration),
            max_duration: overrides.max_duration.unwrap_or(self.max_duration),
            cue_gap: overrides.cue_gap.unwrap_or(self.cue_gap),
        }
    }

    /// Check that the thresholds describe a usable configuration.
    ///
    /// The pipeline itself never fails on odd values (it clamps instead),
    /// but a configuration that would produce degenerate timing is rejected
    /// before it reaches the generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars_per_line == 0 {
            return Err(ConfigError::invalid("max_chars_per_line", "must be greater than zero"));
        }

        if !self.chars_per_second.is_finite() || self.chars_per_second <= 0.0 {
            return Err(ConfigError::invalid(
                "chars_per_second",
                format!("must be a positive number, got {}", self.chars_per_second),
            ));
        }

        for (field, value) in [
            ("base_entry_pause", self.base_entry_pause),
            ("min_duration", self.min_duration),
            ("max_duration", self.max_duration),
            ("cue_gap", self.cue_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        if self.min_duration > self.max_duration {
            return Err(ConfigError::invalid(
                "min_duration",
                format!(
                    "{} is greater than max_duration {}",
                    self.min_duration, self.max_duration
                ),
            ));
        }

        Ok(())
    }
}

/// Partial override of `GeneratorConfig`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chars_per_fragment: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars_per_line: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chars_per_second: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_entry_pause: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue_gap: Option<f64>,
}

impl GeneratorOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merged_with(&self, other: &GeneratorOverrides) -> Self {
        Self {
            min_chars_per_fragment: other.min_chars_per_fragment.or(self.min_chars_per_fragment),
            max_chars_per_line: other.max_chars_per_line.or(self.max_chars_per_line),
            chars_per_second: other.chars_per_second.or(self.chars_per_second),
            base_entry_pause: other.base_entry_pause.or(self.base_entry_pause),
            min_duration: other.min_duration.or(self.min_duration),
            max_duration: other.max_duration.or(self.max_duration),
            cue_gap: other.cue_gap.or(self.cue_gap),
        }
    }

    /// Resolve against the built-in defaults
    pub fn resolve(&self) -> GeneratorConfig {
        GeneratorConfig::default().with_overrides(self)
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&GeneratorConfig> for GeneratorOverrides {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            min_chars_per_fragment: Some(config.min_chars_per_fragment),
            max_chars_per_line: Some(config.max_chars_per_line),
            chars_per_second: Some(config.chars_per_second),
            base_entry_pause: Some(config.base_entry_pause),
            min_duration: Some(config.min_duration),
            max_duration: Some(config.max_duration),
            cue_gap: Some(config.cue_gap),
        }
    }
}

fn default_min_chars_per_fragment() -> usize {
    20
}

fn default_max_chars_per_line() -> usize {
    84
}

fn default_chars_per_second() -> f64 {
    15.0
}

fn default_base_entry_pause() -> f64 {
    0.3
}

fn default_min_duration() -> f64 {
    1.2
}

fn default_max_duration() -> f64 {
    7.0
}

fn default_cue_gap() -> f64 {
    0.1
}
