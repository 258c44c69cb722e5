use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::generation::Cue;

// @module: Subtitle file formats for bilingual cues

// @const: SRT / WebVTT timing line, hours optional for WebVTT
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{1,}):)?(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(?:(\d{1,}):)?(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @const: Target line marker
static TARGET_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<i>(.*)</i>$").unwrap()
});

/// Output/input formats for cue lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    #[default]
    Srt,
    Vtt,
    Json,
}

impl SubtitleFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "json" => Ok(Self::Json),
            other => Err(SubtitleError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Format seconds as `HH:MM:SS,mmm` (SRT) or `HH:MM:SS.mmm` (WebVTT)
pub fn format_timestamp(seconds: f64, separator: char) -> String {
    let ms = seconds_to_ms(seconds);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, separator, millis)
}

/// Parse `HH:MM:SS,mmm`, `HH:MM:SS.mmm` or `MM:SS.mmm` into seconds
pub fn parse_timestamp(timestamp: &str) -> Result<f64, SubtitleError> {
    let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());
    let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

    let (hours, minutes, seconds, millis) = match parts.as_slice() {
        [h, m, s, ms] => (*h, *m, *s, *ms),
        [m, s, ms] => ("0", *m, *s, *ms),
        _ => return Err(invalid()),
    };

    let hours: u64 = hours.parse().map_err(|_| invalid())?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
    let millis: u64 = millis.parse().map_err(|_| invalid())?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(invalid());
    }

    let ms = total_millis(hours, minutes, seconds, millis).ok_or_else(invalid)?;
    Ok(ms as f64 / 1000.0)
}

/// Milliseconds for a timestamp, or `None` if the hour count overflows
fn total_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
}

fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Text block of one cue: source lines as-is, target lines in `<i>` tags
fn cue_text_block(cue: &Cue) -> String {
    let mut lines: Vec<String> = cue
        .source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    lines.extend(
        cue.target
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| format!("<i>{}</i>", line)),
    );
    lines.join("\n")
}

/// Render cues as SRT
pub fn to_srt(cues: &[Cue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(cue.start, ','),
            format_timestamp(cue.end, ','),
            cue_text_block(cue)
        ));
    }
    out
}

/// Render cues as WebVTT
pub fn to_vtt(cues: &[Cue]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(cue.start, '.'),
            format_timestamp(cue.end, '.'),
            cue_text_block(cue)
        ));
    }
    out
}

/// Render cues as a pretty-printed JSON array
pub fn to_json(cues: &[Cue]) -> Result<String, SubtitleError> {
    Ok(serde_json::to_string_pretty(cues)?)
}

/// Render cues in the requested format
pub fn render(cues: &[Cue], format: SubtitleFormat) -> Result<String, SubtitleError> {
    match format {
        SubtitleFormat::Srt => Ok(to_srt(cues)),
        SubtitleFormat::Vtt => Ok(to_vtt(cues)),
        SubtitleFormat::Json => to_json(cues),
    }
}

/// Parse SRT content into cues
pub fn parse_srt_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    parse_timed_blocks(content)
}

/// Parse WebVTT content into cues
pub fn parse_vtt_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    let content = content.trim_start_matches('\u{feff}');
    let first_line = content.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    if !first_line.trim_start().starts_with("WEBVTT") {
        return Err(SubtitleError::MissingHeader);
    }
    parse_timed_blocks(content)
}

/// Parse a JSON cue array
pub fn parse_json_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    let cues: Vec<Cue> = serde_json::from_str(content)?;
    if cues.is_empty() {
        return Err(SubtitleError::NoEntries);
    }
    Ok(cues)
}

/// Parse content in the given format
pub fn parse_string(content: &str, format: SubtitleFormat) -> Result<Vec<Cue>, SubtitleError> {
    match format {
        SubtitleFormat::Srt => parse_srt_string(content),
        SubtitleFormat::Vtt => parse_vtt_string(content),
        SubtitleFormat::Json => parse_json_string(content),
    }
}

/// Shared SRT/WebVTT block parser.
///
/// Blocks are separated by blank lines. A block without a timing line
/// (the WebVTT header, NOTE or STYLE blocks) is ignored; a timed block with
/// an invalid range or no text is skipped with a warning.
fn parse_timed_blocks(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut cues = Vec::new();

    for (block_idx, block) in normalized.split("\n\n").enumerate() {
        let lines: Vec<&str> = block.lines().map(str::trim_end).collect();
        let Some(timing_idx) = lines.iter().position(|line| line.contains("-->")) else {
            continue;
        };

        let Some(caps) = TIMING_LINE_REGEX.captures(lines[timing_idx].trim()) else {
            warn!("Skipping block {}: unreadable timing line '{}'", block_idx + 1, lines[timing_idx]);
            continue;
        };

        let (start, end) = match (timing_from_captures(&caps, 1), timing_from_captures(&caps, 5)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                warn!("Skipping block {}: invalid timestamp values", block_idx + 1);
                continue;
            }
        };

        if end <= start {
            warn!("Skipping block {}: end {:.3}s is not after start {:.3}s", block_idx + 1, end, start);
            continue;
        }

        let mut source_lines = Vec::new();
        let mut target_lines = Vec::new();
        for line in lines[timing_idx + 1..].iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            match TARGET_LINE_REGEX.captures(line) {
                Some(target) => target_lines.push(target[1].trim().to_string()),
                None => source_lines.push(line.to_string()),
            }
        }

        if source_lines.is_empty() && target_lines.is_empty() {
            warn!("Skipping empty subtitle block {}", block_idx + 1);
            continue;
        }

        cues.push(Cue::new(start, end, source_lines.join("\n"), target_lines.join("\n")));
    }

    if cues.is_empty() {
        return Err(SubtitleError::NoEntries);
    }

    let overlap_count = cues.windows(2).filter(|pair| pair[0].end > pair[1].start).count();
    if overlap_count > 0 {
        warn!("Found {} overlapping subtitle entries", overlap_count);
    }

    debug!("Parsed {} cues", cues.len());
    Ok(cues)
}

fn timing_from_captures(caps: &regex::Captures, start_idx: usize) -> Option<f64> {
    let field = |offset: usize| -> Option<u64> {
        caps.get(start_idx + offset).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let hours = field(0)?;
    let minutes = field(1)?;
    let seconds = field(2)?;
    let millis = field(3)?;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let ms = total_millis(hours, minutes, seconds, millis)?;
    Some(ms as f64 / 1000.0)
}

/// A cue list tied to the file it was read from or will be written to
#[derive(Debug, Clone)]
pub struct CueCollection {
    /// File the cues belong to
    pub source_file: PathBuf,

    /// Cues in display order
    pub cues: Vec<Cue>,
}

impl CueCollection {
    pub fn new(source_file: PathBuf, cues: Vec<Cue>) -> Self {
        Self { source_file, cues }
    }

    /// Read a subtitle file, picking the parser from its extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = SubtitleFormat::from_path(path)?;
        let content = FileManager::read_to_string(path)?;
        let cues = parse_string(&content, format)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        Ok(Self::new(path.to_path_buf(), cues))
    }

    /// Write the cues in the given format, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, format: SubtitleFormat) -> Result<()> {
        let rendered = render(&self.cues, format)?;
        FileManager::write_to_file(path, &rendered)
    }

    /// End of the last cue, or zero
    pub fn total_duration(&self) -> f64 {
        self.cues.last().map_or(0.0, |cue| cue.end)
    }
}

impl fmt::Display for CueCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        writeln!(f, "Duration: {}", format_timestamp(self.total_duration(), '.'))?;
        Ok(())
    }
}
