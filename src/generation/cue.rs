use serde::{Deserialize, Serialize};

// @module: Timed bilingual cue

/// One timed subtitle entry with paired source and target text.
///
/// Times are in seconds from the start of the video. Text may contain a
/// single `\n` inserted by display wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub source: String,
    pub target: String,
}

impl Cue {
    pub fn new(start: f64, end: f64, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            start,
            end,
            source: source.into(),
            target: target.into(),
        }
    }

    /// Display length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Number of visible characters in the source text, line breaks excluded
    pub fn source_char_count(&self) -> usize {
        self.source.chars().filter(|c| *c != '\n').count()
    }

    /// Source text with display line breaks folded back into spaces
    pub fn source_unwrapped(&self) -> String {
        self.source.replace('\n', " ")
    }

    /// Target text with display line breaks folded back into spaces
    pub fn target_unwrapped(&self) -> String {
        self.target.replace('\n', " ")
    }
}
