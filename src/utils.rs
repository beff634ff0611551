//! Utility functions for logging previews, slugs and output directories.

use crate::error::Result;
use crate::models::truncate_chars;
use crate::normalize::collapse_whitespace;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const PROBE_FILE: &str = ".article_draft_probe";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Single-line preview of a draft field for log lines.
pub fn preview(text: &str) -> String {
    let compact = collapse_whitespace(text);
    let head = truncate_chars(&compact, 120);
    if head.len() == compact.len() {
        compact
    } else {
        format!("{head}...")
    }
}

/// Convert a title to a file-name friendly slug.
///
/// Lowercases, drops punctuation, and replaces spaces with hyphens.
/// Non-ASCII letters (e.g. Japanese) are kept.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// assert_eq!(slugify_title("Test-Article!"), "test-article");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Create `path` if needed and check that files can be written into it.
///
/// A probe file is written and removed again.
///
/// # Errors
///
/// [`crate::DraftError::Io`] when the directory cannot be created, or the
/// probe cannot be written or removed (permissions, read-only filesystem).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe = Path::new(path).join(PROBE_FILE);
    fs::write(&probe, b"").await?;
    fs::remove_file(&probe).await?;
    info!("Output directory is writable");
    Ok(())
}
