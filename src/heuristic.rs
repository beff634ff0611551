//! Rule-based drafting used whenever the summarization service is off,
//! unreachable or unintelligible.
//!
//! Both functions are pure: the same text and [`HeuristicConfig`] always
//! produce the same output, with no I/O.

use crate::config::HeuristicConfig;
use crate::models::truncate_chars;
use crate::normalize::{collapse_whitespace, normalize_body};
use crate::segment::{is_cjk_char, is_cjk_text, sentences};
use itertools::Itertools;

/// Characters accepted as the end of a sentence.
pub const SENTENCE_CLOSERS: [char; 7] = ['。', '．', '.', '!', '！', '?', '？'];

/// Short multi-line summary: one closed sentence per line, at most
/// `max_summary_lines` lines.
///
/// When the text yields fewer than `min_sentences` sentences (long runs of
/// unpunctuated text, navigation blurbs) the single-line text is cut into
/// `chunk_chars`-wide pieces instead.
pub fn summary(text: &str, cfg: &HeuristicConfig) -> String {
    let normalized = normalize_body(text);
    if normalized.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = sentences(&normalized)
        .map(close_sentence)
        .filter(|line| !line.is_empty())
        .take(cfg.summary_sentences)
        .collect();

    if lines.len() < cfg.min_sentences {
        lines = chunk_lines(&collapse_whitespace(&normalized), cfg.chunk_chars);
    }

    lines.truncate(cfg.max_summary_lines);
    lines.join("\n")
}

/// Markdown body with overview, key points and details sections.
///
/// Text without any sentence is returned normalized but otherwise as-is.
pub fn structured_body(text: &str, cfg: &HeuristicConfig) -> String {
    let normalized = normalize_body(text);
    let all: Vec<&str> = sentences(&normalized).collect();
    let Some((first, rest)) = all.split_first() else {
        return normalized;
    };

    let mut blocks = vec![format!("## {}", cfg.overview_heading), first.to_string()];

    let points: Vec<String> = rest
        .iter()
        .take(cfg.key_points)
        .map(|sentence| format!("- {sentence}"))
        .collect();
    if !points.is_empty() {
        blocks.push(format!("## {}", cfg.key_points_heading));
        blocks.push(points.join("\n"));
    }

    blocks.push(format!("## {}", cfg.details_heading));
    for paragraph in &all.iter().chunks(cfg.paragraph_sentences.max(1)) {
        blocks.push(join_sentences(paragraph.copied()));
    }

    blocks.join("\n\n")
}

/// Ensure a sentence ends with terminal punctuation, appending `。` for CJK
/// text and `.` otherwise.
pub fn close_sentence(sentence: &str) -> String {
    let trimmed = sentence.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.ends_with(SENTENCE_CLOSERS) {
        return trimmed.to_string();
    }
    let stop = if is_cjk_text(trimmed) { '。' } else { '.' };
    format!("{trimmed}{stop}")
}

/// Trim `summary` and cap it at `limit` characters.
///
/// When the cap cuts into a line, that partial line is dropped; a summary
/// that is a single line is cut one character shorter and closed instead.
/// Line breaks are kept.
pub fn bound_summary(summary: &str, limit: usize) -> String {
    let trimmed = summary.trim();
    let cut = truncate_chars(trimmed, limit).trim_end();
    if cut.len() == trimmed.len() || cut.ends_with(SENTENCE_CLOSERS) {
        return cut.to_string();
    }
    match cut.rsplit_once('\n') {
        Some((complete, _)) => complete.trim_end().to_string(),
        None => close_sentence(truncate_chars(cut, limit.saturating_sub(1))),
    }
}

fn chunk_lines(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| close_sentence(&chunk.iter().collect::<String>()))
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

// CJK sentences run together; everything else gets a space.
fn join_sentences<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for part in parts {
        if let Some(last) = out.chars().last() {
            if !is_cjk_char(last) && !"。！？、」』）".contains(last) {
                out.push(' ');
            }
        }
        out.push_str(part);
    }
    out
}
