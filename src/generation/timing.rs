/*!
 * Duration estimation, scaling and overshoot correction.
 */

use log::debug;

use super::config::GeneratorConfig;
use super::cue::Cue;
use super::text::char_len;

/// Lower clamp applied after scaling, independent of the estimator's range
pub const SCALED_MIN_DURATION: f64 = 0.9;

/// Upper clamp applied after scaling, independent of the estimator's range
pub const SCALED_MAX_DURATION: f64 = 7.5;

/// Shortest cue ever emitted, in seconds
pub const MIN_CUE_LENGTH: f64 = 0.1;

/// Fallback total when the video length is unknown: seconds per fragment...
const FALLBACK_SECONDS_PER_FRAGMENT: f64 = 3.0;

/// ...but never less than this
const FALLBACK_MIN_TOTAL_SECONDS: f64 = 30.0;

/// `value.clamp(min, max)` without the panic when `min > max`
fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// True for a usable, known video length
pub fn is_known_duration(video_duration: f64) -> bool {
    video_duration.is_finite() && video_duration > 0.0
}

/// Initial reading-time estimate for one fragment, in seconds
pub fn estimate_duration(fragment: &str, config: &GeneratorConfig) -> f64 {
    let chars = char_len(fragment);
    // A zero or negative speed makes any text take forever to read
    let reading_time = if chars == 0 {
        0.0
    } else if config.chars_per_second > 0.0 {
        chars as f64 / config.chars_per_second
    } else {
        f64::INFINITY
    };

    clamp_range(
        config.base_entry_pause + reading_time,
        config.min_duration,
        config.max_duration,
    )
}

/// Total time the cues should fill.
///
/// The video length when known, otherwise three seconds per fragment with
/// a thirty second floor.
pub fn target_duration(video_duration: f64, fragment_count: usize) -> f64 {
    if is_known_duration(video_duration) {
        video_duration
    } else {
        (fragment_count as f64 * FALLBACK_SECONDS_PER_FRAGMENT).max(FALLBACK_MIN_TOTAL_SECONDS)
    }
}

/// Rescale estimates so their sum approaches the target duration.
///
/// Each scaled value is clamped to `[SCALED_MIN_DURATION, SCALED_MAX_DURATION]`,
/// so the sum can still miss the target; `correct_overshoot` handles the
/// case where that pushes the last cue past the end of the video.
pub fn scale_durations(estimates: &[f64], video_duration: f64) -> Vec<f64> {
    let target = target_duration(video_duration, estimates.len());
    let total: f64 = estimates.iter().sum();
    let scale_factor = if total > 0.0 { target / total } else { 1.0 };

    debug!(
        "Scaling {} durations: estimated {:.2}s, target {:.2}s, factor {:.3}",
        estimates.len(),
        total,
        target,
        scale_factor
    );

    estimates
        .iter()
        .map(|estimate| clamp_range(estimate * scale_factor, SCALED_MIN_DURATION, SCALED_MAX_DURATION))
        .collect()
}

/// Pull cues back so the last one ends at the video's end.
///
/// The overshoot is spread as a linearly growing backward shift: cue `i`
/// (1-based) moves back by `i * overshoot / n`. Starts never go below zero
/// or below the previous cue's end, ends stay at least `MIN_CUE_LENGTH`
/// after their start, and the last end is finally pinned to the video
/// length. Does nothing when the length is unknown or there is no overshoot.
pub fn correct_overshoot(cues: &mut [Cue], video_duration: f64) {
    if !is_known_duration(video_duration) {
        return;
    }
    let Some(last) = cues.last() else {
        return;
    };

    let overshoot = last.end - video_duration;
    if overshoot <= 0.0 {
        return;
    }

    let shrink_per_cue = overshoot / cues.len() as f64;
    debug!(
        "Correcting {:.3}s overshoot across {} cues ({:.3}s per cue)",
        overshoot,
        cues.len(),
        shrink_per_cue
    );

    let mut accumulated = 0.0;
    let mut previous_end = 0.0_f64;
    for cue in cues.iter_mut() {
        accumulated += shrink_per_cue;
        cue.start = (cue.start - accumulated).max(0.0).max(previous_end);
        cue.end = (cue.end - accumulated).max(cue.start + MIN_CUE_LENGTH);
        previous_end = cue.end;
    }

    if let Some(last) = cues.last_mut() {
        last.end = video_duration.max(last.start + MIN_CUE_LENGTH);
    }
}
