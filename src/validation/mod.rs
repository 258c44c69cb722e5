/*!
 * Validation of cue timing.
 *
 * - `timecodes`: range, ordering, overlap, video length and reading speed checks
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{CueCheckResult, CueIssue, CueValidationResult, CueValidator, CueValidatorConfig};
