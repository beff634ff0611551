//! Markdown rendering for drafts.

use crate::models::ArticleDraft;

/// Render a draft as a Markdown document.
///
/// The title becomes a level-one heading, each summary line a blockquote
/// line, and the body follows unchanged. Empty parts are left out.
pub fn draft_to_markdown(draft: &ArticleDraft, url: &str) -> String {
    let mut md = String::new();

    let title = draft.title.trim();
    if !title.is_empty() {
        md.push_str(&format!("# {title}\n\n"));
    }

    let summary = draft.summary.trim();
    if !summary.is_empty() {
        for line in summary.lines() {
            md.push_str(&format!("> {}\n", line.trim()));
        }
        md.push('\n');
    }

    let content = draft.content.trim();
    if !content.is_empty() {
        md.push_str(content);
        md.push_str("\n\n");
    }

    md.push_str(&format!("Source: <{url}>\n"));
    md
}
