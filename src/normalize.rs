//! Canonicalization of text extracted from web pages.
//!
//! Page text arrives with mixed line endings, indentation runs and pointers
//! to figures ("図3", "Fig. 2") that will never be shown next to the draft.
//! [`normalize_body`] flattens all of that so every later stage sees the same
//! shape of input.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Replacement for figure references ("this figure").
pub const FIGURE_PHRASE: &str = "この図";

static FIGURE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(図|Fig(?:\.|ure)?)\s*[0-9０-９]+").unwrap());

static HORIZONTAL_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize raw page text.
///
/// Steps, in order: unify line endings, neutralize figure references,
/// collapse runs of spaces/tabs, cap blank lines at one, trim. Applying it
/// twice gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// use article_draft::normalize::normalize_body;
///
/// assert_eq!(normalize_body("図1を参照。\r\n\r\n\r\n次へ"), "この図を参照。\n\n次へ");
/// ```
pub fn normalize_body(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let unified = neutralize_figures(&unified);
    let unified = HORIZONTAL_RUNS.replace_all(&unified, " ");
    let unified = NEWLINE_RUNS.replace_all(&unified, "\n\n");
    unified.trim().to_string()
}

// A `図` already preceded by `この` is a replaced marker; whatever follows it
// is article text and stays.
fn neutralize_figures(text: &str) -> Cow<'_, str> {
    FIGURE_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        if whole.starts_with('図') && text[..start].ends_with("この") {
            whole.to_string()
        } else {
            FIGURE_PHRASE.to_string()
        }
    })
}

/// Collapse every whitespace run (newlines included) into one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
