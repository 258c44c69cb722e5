/*!
 * End-to-end tests: transcripts in, subtitle files out
 */

use std::fs;
use anyhow::Result;
use dualsub::app_config::Config;
use dualsub::app_controller::{Controller, GenerationOutcome, GenerationRequest};
use dualsub::subtitle_processor::{CueCollection, SubtitleFormat};
use dualsub::GeneratorOverrides;
use crate::common;

fn written(outcome: GenerationOutcome) -> (std::path::PathBuf, usize) {
    match outcome {
        GenerationOutcome::Written { output_path, cue_count, .. } => (output_path, cue_count),
        GenerationOutcome::Skipped { output_path } => panic!("unexpected skip of {:?}", output_path),
    }
}

/// Test the default workflow writes an SRT next to the source transcript
#[test]
fn test_generate_withDefaults_shouldWriteSrtNextToSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let controller = Controller::with_config(Config::default())?;

    let mut request = GenerationRequest::new(&source, &target);
    request.video_duration = 60.0;
    let (output_path, cue_count) = written(controller.generate(&request)?);

    assert_eq!(output_path, temp_dir.path().join("lesson.en.srt"));
    assert_eq!(cue_count, 8);

    let content = fs::read_to_string(&output_path)?;
    assert!(content.starts_with("1\n00:00:00,000 --> "));
    assert!(content.contains("<i>Tiếp theo, mở một cửa sổ dòng lệnh.</i>"));

    let collection = CueCollection::from_file(&output_path)?;
    assert_eq!(collection.cues.len(), 8);
    common::assert_cue_layout(&collection.cues, 60.0);
    Ok(())
}

/// Test that the output extension picks the format
#[test]
fn test_generate_withVttOutputPath_shouldWriteWebVtt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let output = temp_dir.path().join("out").join("lesson.vtt");
    let controller = Controller::with_config(Config::default())?;

    let mut request = GenerationRequest::new(&source, &target);
    request.output_path = Some(output.clone());
    let (output_path, _) = written(controller.generate(&request)?);

    assert_eq!(output_path, output);
    assert!(fs::read_to_string(&output)?.starts_with("WEBVTT"));
    Ok(())
}

/// Test that an explicit format wins over the config default
#[test]
fn test_generate_withJsonFormat_shouldWriteJsonCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let mut config = Config::default();
    config.output.format = SubtitleFormat::Vtt;
    let controller = Controller::with_config(config)?;

    let mut request = GenerationRequest::new(&source, &target);
    request.format = Some(SubtitleFormat::Json);
    request.video_duration = 20.0;
    let (output_path, _) = written(controller.generate(&request)?);

    assert_eq!(output_path, temp_dir.path().join("lesson.en.json"));
    let cues: Vec<dualsub::Cue> = serde_json::from_str(&fs::read_to_string(&output_path)?)?;
    assert_eq!(cues.len(), 8);
    assert!((cues[7].end - 20.0).abs() < 1e-9);
    Ok(())
}

/// Test that the config file's format is used when nothing else is given
#[test]
fn test_generate_withConfigFormat_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let mut config = Config::default();
    config.output.format = SubtitleFormat::Vtt;
    let controller = Controller::with_config(config)?;

    let (output_path, _) = written(controller.generate(&GenerationRequest::new(&source, &target))?);

    assert_eq!(output_path, temp_dir.path().join("lesson.en.vtt"));
    Ok(())
}

/// Test that an existing output is left alone without force
#[test]
fn test_generate_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let existing = common::create_test_file(temp_dir.path(), "lesson.en.srt", "keep me")?;
    let controller = Controller::with_config(Config::default())?;

    let mut request = GenerationRequest::new(&source, &target);
    let outcome = controller.generate(&request)?;

    assert!(matches!(outcome, GenerationOutcome::Skipped { .. }));
    assert_eq!(fs::read_to_string(&existing)?, "keep me");

    request.force_overwrite = true;
    written(controller.generate(&request)?);
    assert_ne!(fs::read_to_string(&existing)?, "keep me");
    Ok(())
}

/// Test that command line overrides beat the config file
#[test]
fn test_generate_withOverrides_shouldLayerOverConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        temp_dir.path(),
        "clauses.txt",
        "We start by opening the project folder in the editor, and then we run the build script once.",
    )?;
    let target = common::create_test_file(
        temp_dir.path(),
        "clauses.vi.txt",
        "Mở thư mục dự án trong trình soạn thảo. Sau đó chạy tập lệnh xây dựng.",
    )?;
    let mut config = Config::default();
    config.generator.cue_gap = Some(0.3);
    config.output.format = SubtitleFormat::Json;
    let controller = Controller::with_config(config)?;

    let mut request = GenerationRequest::new(&source, &target);
    request.overrides = GeneratorOverrides {
        cue_gap: Some(0.5),
        ..Default::default()
    };
    let (output_path, _) = written(controller.generate(&request)?);

    let collection = CueCollection::from_file(&output_path)?;
    assert_eq!(collection.cues.len(), 2);
    assert!((collection.cues[1].start - 8.0).abs() < 1e-9);
    Ok(())
}

/// Test that invalid overrides are rejected before anything is written
#[test]
fn test_generate_withInvalidOverrides_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let controller = Controller::with_config(Config::default())?;

    let mut request = GenerationRequest::new(&source, &target);
    request.overrides.chars_per_second = Some(0.0);

    assert!(controller.generate(&request).is_err());
    assert!(!temp_dir.path().join("lesson.en.srt").exists());
    Ok(())
}

/// Test that a missing transcript is an error
#[test]
fn test_generate_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "vi.txt", "Xin chào.")?;
    let controller = Controller::with_config(Config::default())?;

    let request = GenerationRequest::new(temp_dir.path().join("missing.txt"), &target);

    assert!(controller.generate(&request).is_err());
    Ok(())
}

/// Test that validation results come back with the outcome
#[test]
fn test_generate_withValidationEnabled_shouldReturnPassingResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let controller = Controller::with_config(Config::default())?;

    let mut request = GenerationRequest::new(&source, &target);
    request.video_duration = 20.0;

    match controller.generate(&request)? {
        GenerationOutcome::Written { validation: Some(result), .. } => {
            assert!(result.passed);
            assert_eq!(result.entry_results.len(), 8);
        }
        other => panic!("expected a validated write, got {:?}", other),
    }
    Ok(())
}

/// Test that disabling validation skips it
#[test]
fn test_generate_withValidationDisabled_shouldReturnNoResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let mut config = Config::default();
    config.output.validate = false;
    let controller = Controller::with_config(config)?;

    match controller.generate(&GenerationRequest::new(&source, &target))? {
        GenerationOutcome::Written { validation, .. } => assert!(validation.is_none()),
        other => panic!("expected a write, got {:?}", other),
    }
    Ok(())
}

/// Test checking a generated file against a shorter video
#[test]
fn test_check_withShorterVideo_shouldReportFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (source, target) = common::create_lesson_transcripts(temp_dir.path())?;
    let controller = Controller::with_config(Config::default())?;

    let mut request = GenerationRequest::new(&source, &target);
    request.video_duration = 60.0;
    let (output_path, _) = written(controller.generate(&request)?);

    assert!(controller.check(&output_path, 60.0)?.passed);
    assert!(controller.check(&output_path, 0.0)?.passed);

    let short = controller.check(&output_path, 30.0)?;
    assert!(!short.passed);
    assert_eq!(short.failed_entries().len(), 1);
    Ok(())
}

/// Test checking a file with no cues
#[test]
fn test_check_withEmptySubtitle_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "empty.srt", "")?;
    let controller = Controller::with_config(Config::default())?;

    assert!(controller.check(&path, 0.0).is_err());
    Ok(())
}
