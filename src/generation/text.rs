/*!
 * Text segmentation for cue generation.
 *
 * Raw transcript text goes through these steps before any timing is
 * assigned:
 * - `normalize_text`: collapse whitespace and tighten punctuation
 * - `split_sentences`: cut at terminal punctuation
 * - `merge_short_fragments`: glue fragments too short to read on their own
 * - `split_long_fragments`: break over-long fragments once near the middle
 *
 * `wrap_display_text` is applied last, when a fragment becomes cue text.
 *
 * All lengths are counted in characters, not bytes.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Soft limit for one display line of cue text
pub const DISPLAY_LINE_LIMIT: usize = 42;

/// Punctuation a long fragment may be broken after
const BREAK_PUNCTUATION: [char; 5] = [',', ';', ':', '—', '–'];

/// Runs of whitespace or control characters
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\p{Cc}]+").unwrap()
});

/// Spaces sitting in front of punctuation
static SPACE_BEFORE_PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" +([.,!?…])").unwrap()
});

/// Terminal punctuation followed by the whitespace we split on
static SENTENCE_BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?…]\s+").unwrap()
});

/// Count characters the way every threshold in this module does
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Collapse whitespace to single spaces, drop spaces before `.,!?…`, trim.
///
/// Idempotent: normalizing an already normalized string returns it unchanged.
pub fn normalize_text(text: &str) -> String {
    let collapsed = WHITESPACE_REGEX.replace_all(text, " ");
    let tightened = SPACE_BEFORE_PUNCTUATION_REGEX.replace_all(&collapsed, "$1");
    tightened.trim().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Split normalized text into sentence-like units.
///
/// A literal `...` is first folded into `…` so it counts as one boundary.
/// Terminal punctuation stays attached to the sentence it ends. Text with
/// no terminal punctuation comes back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.replace("...", "…");
    let mut sentences = Vec::new();
    let mut sentence_start = 0;

    for boundary in SENTENCE_BOUNDARY_REGEX.find_iter(&text) {
        let punctuation_len = text[boundary.start()..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        push_trimmed(&mut sentences, &text[sentence_start..boundary.start() + punctuation_len]);
        sentence_start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[sentence_start..]);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Merge fragments so none is shorter than `min_chars`.
///
/// Walks the input in order; whenever the last accumulated fragment or the
/// incoming one is below the threshold, the incoming one is appended to the
/// last instead of starting a new entry. Order is never changed.
pub fn merge_short_fragments(sentences: &[String], min_chars: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        match merged.last_mut() {
            Some(previous) if char_len(previous) < min_chars || char_len(sentence) < min_chars => {
                *previous = collapse_whitespace(&format!("{} {}", previous, sentence));
            }
            _ => merged.push(sentence.clone()),
        }
    }

    merged
}

/// Break a fragment longer than `max_chars` into two parts near its middle.
///
/// Prefers the break punctuation closest to the midpoint, then whitespace at
/// or before it, then whitespace after it. Only one split is made, so a
/// fragment more than twice the limit stays over-long on one side.
pub fn split_long_fragment(fragment: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = fragment.chars().collect();
    let len = chars.len();
    if len <= max_chars {
        return vec![fragment.to_string()];
    }

    let mid = len / 2;
    let break_at = punctuation_break(&chars, mid).or_else(|| whitespace_break(&chars, mid));

    match break_at {
        Some(at) if at > 0 && at < len => {
            let left: String = chars[..at].iter().collect();
            let right: String = chars[at..].iter().collect();
            let mut parts = Vec::with_capacity(2);
            push_trimmed(&mut parts, &left);
            push_trimmed(&mut parts, &right);
            if parts.is_empty() {
                vec![fragment.to_string()]
            } else {
                parts
            }
        }
        _ => vec![fragment.to_string()],
    }
}

/// Apply `split_long_fragment` to every fragment, keeping order
pub fn split_long_fragments(fragments: &[String], max_chars: usize) -> Vec<String> {
    fragments
        .iter()
        .flat_map(|fragment| split_long_fragment(fragment, max_chars))
        .collect()
}

/// Position just after the break punctuation closest to `mid`.
///
/// A later candidate replaces the current best when it is at least as
/// close, so equidistant marks resolve to the last one seen.
fn punctuation_break(chars: &[char], mid: usize) -> Option<usize> {
    let mut best: Option<usize> = None;

    for (idx, c) in chars.iter().enumerate() {
        if !BREAK_PUNCTUATION.contains(c) {
            continue;
        }
        let replace = match best {
            None => true,
            Some(current) => idx.abs_diff(mid) <= current.abs_diff(mid),
        };
        if replace {
            best = Some(idx);
        }
    }

    best.map(|idx| idx + 1)
}

/// Whitespace at or before `mid`, else the first whitespace after it
fn whitespace_break(chars: &[char], mid: usize) -> Option<usize> {
    let upper = mid.min(chars.len().saturating_sub(1));
    chars[..=upper]
        .iter()
        .rposition(|c| c.is_whitespace())
        .or_else(|| {
            chars[upper + 1..]
                .iter()
                .position(|c| c.is_whitespace())
                .map(|pos| upper + 1 + pos)
        })
}

/// Wrap cue text onto at most two display lines.
///
/// Text longer than `DISPLAY_LINE_LIMIT` gets one line break at the last
/// whitespace at or before the limit. Text without such whitespace is left
/// on one line.
pub fn wrap_display_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= DISPLAY_LINE_LIMIT {
        return text.to_string();
    }

    match chars[..=DISPLAY_LINE_LIMIT].iter().rposition(|c| c.is_whitespace()) {
        Some(idx) if idx > 0 => {
            let first: String = chars[..idx].iter().collect();
            let second: String = chars[idx + 1..].iter().collect();
            format!("{}\n{}", first.trim_end(), second.trim_start())
        }
        _ => text.to_string(),
    }
}
