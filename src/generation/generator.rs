use log::debug;

use super::config::GeneratorConfig;
use super::cue::Cue;
use super::text::{
    merge_short_fragments, normalize_text, split_long_fragments, split_sentences, wrap_display_text,
};
use super::timing::{MIN_CUE_LENGTH, correct_overshoot, estimate_duration, is_known_duration, scale_durations};

// @module: Bilingual cue generation pipeline

/// Source and target fragments that will share one cue
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub source: String,
    pub target: String,
}

/// Fragments of one text plus the sentence count they were built from
#[derive(Debug, Clone)]
pub struct ProcessedText {
    /// Sentences before merging and splitting
    pub sentence_count: usize,
    /// Fragments after merging and splitting
    pub fragments: Vec<String>,
}

/// Generates timed bilingual cues from two transcripts.
///
/// The pipeline runs once per call and keeps no state between calls:
/// normalize, split, merge, split long, align, estimate, scale, assemble,
/// correct overshoot. Any input, including empty text, yields a well
/// formed (possibly empty) cue list.
#[derive(Debug, Clone, Default)]
pub struct SubtitleGenerator {
    config: GeneratorConfig,
}

impl SubtitleGenerator {
    /// Create a generator with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with custom thresholds
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Normalize and segment one transcript
    pub fn process_text(&self, text: &str) -> ProcessedText {
        let sentences = split_sentences(&normalize_text(text));
        let merged = merge_short_fragments(&sentences, self.config.min_chars_per_fragment);
        let fragments = split_long_fragments(&merged, self.config.max_chars_per_line);

        ProcessedText {
            sentence_count: sentences.len(),
            fragments,
        }
    }

    /// Pair source and target fragments by position.
    ///
    /// Both fragment lists are cut to the larger of the two sentence counts
    /// taken before merging. The pair count is then the longer of the two
    /// cut lists; a missing side becomes an empty string. No attempt is made
    /// to match sentences by meaning, so texts with very different sentence
    /// structure can pair unrelated fragments.
    pub fn align(&self, source_text: &str, target_text: &str) -> Vec<AlignedPair> {
        let source = self.process_text(source_text);
        let target = self.process_text(target_text);

        let max_length = source.sentence_count.max(target.sentence_count);
        let mut source_fragments = source.fragments;
        let mut target_fragments = target.fragments;
        source_fragments.truncate(max_length);
        target_fragments.truncate(max_length);

        debug!(
            "Aligning {} source and {} target fragments ({} / {} sentences)",
            source_fragments.len(),
            target_fragments.len(),
            source.sentence_count,
            target.sentence_count
        );

        let pair_count = source_fragments.len().max(target_fragments.len());
        let mut source_iter = source_fragments.into_iter();
        let mut target_iter = target_fragments.into_iter();

        (0..pair_count)
            .map(|_| AlignedPair {
                source: source_iter.next().unwrap_or_default(),
                target: target_iter.next().unwrap_or_default(),
            })
            .collect()
    }

    /// Lay pairs out back to back, one cue per pair.
    ///
    /// `durations` is matched to `pairs` by index; extra entries on either
    /// side are ignored.
    pub fn assemble(&self, pairs: &[AlignedPair], durations: &[f64]) -> Vec<Cue> {
        let cue_gap = self.config.cue_gap.max(0.0);
        let mut current_time = 0.0_f64;
        let mut cues = Vec::with_capacity(pairs.len());

        for (pair, duration) in pairs.iter().zip(durations) {
            let start = current_time.max(0.0);
            let end = (start + duration).max(start + MIN_CUE_LENGTH);

            cues.push(Cue::new(
                start,
                end,
                wrap_display_text(&pair.source),
                wrap_display_text(&pair.target),
            ));

            current_time = end + cue_gap;
        }

        cues
    }

    /// Run the whole pipeline.
    ///
    /// `video_duration` is in seconds; zero, negative or non-finite means
    /// unknown, in which case the total length is derived from the fragment
    /// count and no overshoot correction runs.
    pub fn generate(&self, source_text: &str, target_text: &str, video_duration: f64) -> Vec<Cue> {
        let pairs = self.align(source_text, target_text);
        if pairs.is_empty() {
            debug!("No fragments to time, returning no cues");
            return Vec::new();
        }

        let estimates: Vec<f64> = pairs
            .iter()
            .map(|pair| estimate_duration(&pair.source, &self.config))
            .collect();

        let video_duration = if is_known_duration(video_duration) {
            video_duration
        } else {
            0.0
        };
        let durations = scale_durations(&estimates, video_duration);

        let mut cues = self.assemble(&pairs, &durations);
        correct_overshoot(&mut cues, video_duration);

        debug!(
            "Generated {} cues ending at {:.2}s",
            cues.len(),
            cues.last().map_or(0.0, |cue| cue.end)
        );

        cues
    }
}

/// Generate cues with the given configuration.
///
/// Convenience wrapper around `SubtitleGenerator::generate`.
pub fn generate(source_text: &str, target_text: &str, video_duration: f64, config: &GeneratorConfig) -> Vec<Cue> {
    SubtitleGenerator::with_config(config.clone()).generate(source_text, target_text, video_duration)
}
