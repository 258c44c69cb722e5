/*!
 * Bilingual cue generation.
 *
 * Turns a source-language transcript and its translation into an ordered,
 * non-overlapping list of timed cues.
 *
 * # Architecture
 *
 * - `config`: tunable thresholds and partial overrides
 * - `cue`: the timed cue type
 * - `text`: normalization, sentence splitting, fragment merge/split, wrapping
 * - `timing`: duration estimate, scaling, overshoot correction
 * - `generator`: alignment, assembly and the end-to-end pipeline
 */

pub mod config;
pub mod cue;
pub mod text;
pub mod timing;
pub mod generator;

// Re-export main types
pub use config::{GeneratorConfig, GeneratorOverrides};
pub use cue::Cue;
pub use generator::{AlignedPair, ProcessedText, SubtitleGenerator, generate};
pub use text::normalize_text;
