//! Prompt construction for the summarization service.

use crate::models::truncate_chars;

/// Placeholder replaced by the article text in a prompt template.
pub const ARTICLE_PLACEHOLDER: &str = "{article}";

/// Build the user prompt from normalized article text.
///
/// The text is cut to `char_limit` characters before being placed into
/// `template`. Templates without the `{article}` placeholder get the text
/// appended under an article heading.
pub fn build_prompt(template: &str, text: &str, char_limit: usize) -> String {
    let excerpt = truncate_chars(text, char_limit);
    if template.contains(ARTICLE_PLACEHOLDER) {
        template.replacen(ARTICLE_PLACEHOLDER, excerpt, 1)
    } else {
        format!("{}\n\n# 記事本文\n{}", template.trim_end(), excerpt)
    }
}
