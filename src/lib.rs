/*!
 * # dualsub - bilingual subtitle cue generator
 *
 * A Rust library for turning a lesson transcript and its translation into
 * timed bilingual subtitle cues.
 *
 * ## Features
 *
 * - Sentence splitting with short-fragment merging and long-fragment breaking
 * - Reading-speed based timing, rescaled to the video length when known
 * - Non-overlapping cue layout with overshoot correction
 * - SRT, WebVTT and JSON output, and parsing of the same formats
 * - Timing validation of generated or existing cue files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `generation`: the cue generation pipeline:
 *   - `generation::text`: normalization and segmentation
 *   - `generation::timing`: duration estimation and correction
 *   - `generation::generator`: alignment and assembly
 * - `subtitle_processor`: SRT/WebVTT/JSON rendering and parsing
 * - `validation`: cue timing checks
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod generation;
pub mod subtitle_processor;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use generation::{Cue, GeneratorConfig, GeneratorOverrides, SubtitleGenerator, generate, normalize_text};
pub use subtitle_processor::{CueCollection, SubtitleFormat};
pub use errors::{AppError, ConfigError, SubtitleError};
