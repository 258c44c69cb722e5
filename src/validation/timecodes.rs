/*!
 * Timecode validation for generated or parsed cues.
 *
 * This module validates that cue timings are:
 * - Logically consistent (start < end)
 * - Ordered by start time and non-overlapping
 * - Within the video length, when it is known
 * - Within reasonable reading speed limits
 */

use log::debug;

use crate::generation::Cue;

/// Maximum characters per second for readable subtitles
/// Research suggests 15-25 CPS is readable
const DEFAULT_MAX_CPS: f64 = 25.0;

/// Slack allowed when comparing times, in seconds (one millisecond)
const DEFAULT_TOLERANCE_SECS: f64 = 0.001;

/// Result of timecode validation for a single cue
#[derive(Debug, Clone)]
pub struct CueCheckResult {
    /// 1-based position of the cue
    pub seq_num: usize,
    /// Whether the cue passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<CueIssue>,
}

impl CueCheckResult {
    fn new(seq_num: usize) -> Self {
        Self {
            seq_num,
            passed: true,
            issues: vec![],
        }
    }

    fn fail(&mut self, issue: CueIssue) {
        self.passed = false;
        self.issues.push(issue);
    }

    fn warn(&mut self, issue: CueIssue) {
        self.issues.push(issue);
    }
}

/// Types of cue timing issues
#[derive(Debug, Clone, PartialEq)]
pub enum CueIssue {
    /// End is not after start
    InvalidTimeRange { start: f64, end: f64 },
    /// Starts before the previous cue started
    OutOfOrder { prev_seq_num: usize },
    /// Overlaps the previous cue
    OverlapsWithPrevious { prev_seq_num: usize, overlap: f64 },
    /// Ends after the known video length
    ExceedsVideoDuration { end: f64, video_duration: f64 },
    /// Reading speed exceeds limit (warning only)
    ReadingSpeedTooHigh { cps: f64, max_cps: f64 },
}

impl std::fmt::Display for CueIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CueIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s >= end {:.3}s", start, end)
            }
            CueIssue::OutOfOrder { prev_seq_num } => {
                write!(f, "Starts before cue {}", prev_seq_num)
            }
            CueIssue::OverlapsWithPrevious { prev_seq_num, overlap } => {
                write!(f, "Overlaps with cue {} by {:.3}s", prev_seq_num, overlap)
            }
            CueIssue::ExceedsVideoDuration { end, video_duration } => {
                write!(
                    f,
                    "Ends at {:.3}s, after the video ends at {:.3}s",
                    end, video_duration
                )
            }
            CueIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "Reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
        }
    }
}

/// Result of validating a whole cue list
#[derive(Debug, Clone)]
pub struct CueValidationResult {
    /// Overall pass/fail status (reading speed never fails a cue)
    pub passed: bool,
    /// Results for each cue
    pub entry_results: Vec<CueCheckResult>,
    /// Total number of issues, warnings included
    pub total_issues: usize,
    /// Number of overlapping neighbours
    pub overlap_count: usize,
}

impl CueValidationResult {
    /// Get all failed cues
    pub fn failed_entries(&self) -> Vec<&CueCheckResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }

    /// Cues carrying any issue, warnings included
    pub fn entries_with_issues(&self) -> impl Iterator<Item = &CueCheckResult> {
        self.entry_results.iter().filter(|r| !r.issues.is_empty())
    }
}

/// Configuration for cue validation
#[derive(Debug, Clone)]
pub struct CueValidatorConfig {
    /// Maximum characters per second of source text
    pub max_cps: f64,
    /// Known video length in seconds (None = unknown)
    pub video_duration: Option<f64>,
    /// Slack when comparing times
    pub tolerance: f64,
}

impl Default for CueValidatorConfig {
    fn default() -> Self {
        Self {
            max_cps: DEFAULT_MAX_CPS,
            video_duration: None,
            tolerance: DEFAULT_TOLERANCE_SECS,
        }
    }
}

/// Timecode validator for cue lists
pub struct CueValidator {
    config: CueValidatorConfig,
}

impl CueValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: CueValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: CueValidatorConfig) -> Self {
        Self { config }
    }

    /// Create a validator that also checks the video length
    pub fn for_video(video_duration: f64) -> Self {
        let video_duration = (video_duration.is_finite() && video_duration > 0.0).then_some(video_duration);
        Self::with_config(CueValidatorConfig {
            video_duration,
            ..Default::default()
        })
    }

    /// Validate a single cue in isolation
    pub fn validate_cue(&self, seq_num: usize, cue: &Cue) -> CueCheckResult {
        let mut result = CueCheckResult::new(seq_num);

        if cue.end <= cue.start || !cue.start.is_finite() || !cue.end.is_finite() {
            result.fail(CueIssue::InvalidTimeRange {
                start: cue.start,
                end: cue.end,
            });
            // Can't do further validation with invalid times
            return result;
        }

        let cps = Self::calculate_cps(cue);
        if cps > self.config.max_cps {
            result.warn(CueIssue::ReadingSpeedTooHigh {
                cps,
                max_cps: self.config.max_cps,
            });
        }

        result
    }

    /// Validate a cue list in display order
    pub fn validate_cues(&self, cues: &[Cue]) -> CueValidationResult {
        let mut entry_results: Vec<CueCheckResult> = cues
            .iter()
            .enumerate()
            .map(|(i, cue)| self.validate_cue(i + 1, cue))
            .collect();

        let mut overlap_count = 0;
        for (i, pair) in cues.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let result = &mut entry_results[i + 1];

            if current.start + self.config.tolerance < previous.start {
                result.fail(CueIssue::OutOfOrder { prev_seq_num: i + 1 });
            }

            let overlap = previous.end - current.start;
            if overlap > self.config.tolerance {
                overlap_count += 1;
                result.fail(CueIssue::OverlapsWithPrevious {
                    prev_seq_num: i + 1,
                    overlap,
                });
            }
        }

        if let (Some(video_duration), Some(last)) = (self.config.video_duration, cues.last()) {
            if last.end > video_duration + self.config.tolerance {
                if let Some(result) = entry_results.last_mut() {
                    result.fail(CueIssue::ExceedsVideoDuration {
                        end: last.end,
                        video_duration,
                    });
                }
            }
        }

        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Cue validation: {} cues, {} issues, {} overlaps",
            cues.len(),
            total_issues,
            overlap_count
        );

        CueValidationResult {
            passed,
            entry_results,
            total_issues,
            overlap_count,
        }
    }

    /// Calculate reading speed (source characters per second) for a cue
    pub fn calculate_cps(cue: &Cue) -> f64 {
        let duration = cue.duration();
        if duration <= 0.0 {
            return f64::INFINITY;
        }
        cue.source_char_count() as f64 / duration
    }
}

impl Default for CueValidator {
    fn default() -> Self {
        Self::new()
    }
}
