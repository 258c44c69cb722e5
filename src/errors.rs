/*!
 * Error types for the dualsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Cue generation
 * itself cannot fail; these cover configuration and subtitle file handling.
 */

use thiserror::Error;

/// Errors raised when generator settings are unusable
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field holds a value the generator cannot work with
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while reading or writing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A WebVTT document did not start with the WEBVTT signature
    #[error("Missing WEBVTT header")]
    MissingHeader,

    /// Parsing finished without a single usable cue
    #[error("No valid subtitle entries were found")]
    NoEntries,

    /// The file extension or requested format is not supported
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// JSON cue lists failed to (de)serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

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
