/*!
 * Tests for error types and conversions
 */

use std::io;
use dualsub::errors::{AppError, ConfigError, SubtitleError};
use dualsub::GeneratorConfig;

/// Test config error message and field
#[test]
fn test_configError_invalid_shouldNameField() {
    let error = ConfigError::invalid("cue_gap", "must be a non-negative number, got -1");

    assert_eq!(
        error.to_string(),
        "Invalid value for cue_gap: must be a non-negative number, got -1"
    );
}

/// Test that validation reports the offending field
#[test]
fn test_generatorConfig_validate_shouldReportOffendingField() {
    let config = GeneratorConfig {
        max_chars_per_line: 0,
        ..Default::default()
    };

    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "max_chars_per_line"),
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

/// Test subtitle error messages
#[test]
fn test_subtitleError_display_shouldDescribeProblem() {
    assert_eq!(
        SubtitleError::InvalidTimestamp("99:99".to_string()).to_string(),
        "Invalid timestamp: 99:99"
    );
    assert_eq!(SubtitleError::MissingHeader.to_string(), "Missing WEBVTT header");
    assert_eq!(
        SubtitleError::UnsupportedFormat("ass".to_string()).to_string(),
        "Unsupported subtitle format: ass"
    );
}

/// Test conversions into the application error
#[test]
fn test_appError_from_shouldWrapSourceErrors() {
    let from_config: AppError = ConfigError::invalid("min_duration", "too large").into();
    assert!(matches!(from_config, AppError::Config(_)));

    let from_subtitle: AppError = SubtitleError::NoEntries.into();
    assert_eq!(
        from_subtitle.to_string(),
        "Subtitle error: No valid subtitle entries were found"
    );

    let from_io: AppError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(from_anyhow.to_string(), "Unknown error: something odd");
}

/// Test that JSON failures convert into a subtitle error
#[test]
fn test_subtitleError_fromSerdeJson_shouldWrap() {
    let json_error = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();

    let error: SubtitleError = json_error.into();

    assert!(matches!(error, SubtitleError::Json(_)));
    assert!(error.to_string().starts_with("JSON error:"));
}
