/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use dualsub::file_utils::{FileManager, FileType};
use dualsub::subtitle_processor::SubtitleFormat;
use crate::common;

/// Test output path generation next to the input
#[test]
fn test_generateOutputPath_withoutOutputDir_shouldUseInputDirectory() {
    let output = FileManager::generate_output_path("/videos/lesson01.txt", None, "srt");

    assert_eq!(output, PathBuf::from("/videos/lesson01.srt"));
}

/// Test output path generation with an explicit directory and dotted extension
#[test]
fn test_generateOutputPath_withOutputDir_shouldJoinStem() {
    let output = FileManager::generate_output_path("/videos/lesson01.en.txt", Some(Path::new("/out")), ".vtt");

    assert_eq!(output, PathBuf::from("/out/lesson01.en.vtt"));
}

/// Test file and directory existence checks
#[test]
fn test_fileExists_withFileAndDirectory_shouldDistinguish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.txt", "text")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&file));
    Ok(())
}

/// Test that writing creates missing parent directories
#[test]
fn test_writeToFile_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(fs::read_to_string(&path)?, "content");
    Ok(())
}

/// Test that a UTF-8 byte order mark is dropped on read
#[test]
fn test_readToString_withBom_shouldStripIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bom.txt", "\u{feff}Xin chào.")?;

    assert_eq!(FileManager::read_to_string(&path)?, "Xin chào.");
    Ok(())
}

/// Test that reading a missing file reports an error
#[test]
fn test_readToString_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(FileManager::read_to_string(temp_dir.path().join("missing.txt")).is_err());
    Ok(())
}

/// Test file type detection by extension
#[test]
fn test_detectFileType_withKnownExtensions_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "lesson.TXT", "text")?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "lesson.srt")?;
    let vtt = common::create_test_file(temp_dir.path(), "lesson.vtt", "WEBVTT\n")?;
    let other = common::create_test_file(temp_dir.path(), "lesson.mp4", "")?;

    assert_eq!(FileManager::detect_file_type(&transcript)?, FileType::Transcript);
    assert_eq!(FileManager::detect_file_type(&subtitle)?, FileType::Subtitle(SubtitleFormat::Srt));
    assert_eq!(FileManager::detect_file_type(&vtt)?, FileType::Subtitle(SubtitleFormat::Vtt));
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    Ok(())
}

/// Test that detection fails for a file that does not exist
#[test]
fn test_detectFileType_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(FileManager::detect_file_type(temp_dir.path().join("nothing.txt")).is_err());
    Ok(())
}

/// Test that ensure_dir tolerates an existing directory
#[test]
fn test_ensureDir_withExistingDirectory_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("x").join("y");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}
