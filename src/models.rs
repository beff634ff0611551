//! Data models for drafts and for the summarization service wire format.
//!
//! This module defines the values that flow through the pipeline:
//! - [`FetchedPage`]: Title and raw text retrieved from the article URL
//! - [`DraftFields`]: The JSON object the model is asked to return
//! - [`ArticleDraft`]: The final `{title, content, summary}` triple
//! - [`PostOverrides`]: Fields a person typed in that win over the draft
//! - Chat completion request/response types for the service call

use crate::normalize::collapse_whitespace;
use serde::{Deserialize, Serialize};

/// Title and main text of a page, as retrieved.
///
/// # Fields
///
/// * `title` - The `<title>` text, or the "no title" sentinel
/// * `raw_text` - Article (or body) text, empty when retrieval failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub title: String,
    pub raw_text: String,
}

/// Fields recovered from the model's JSON reply.
///
/// Every key is optional on the wire and defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DraftFields {
    pub title: String,
    pub content: String,
    pub summary: String,
}

/// A draft post produced from an article URL.
///
/// All three fields are always present; any of them may be empty. The
/// assembler bounds `summary` before handing the draft out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleDraft {
    /// Headline for the post.
    pub title: String,
    /// Markdown body: the model's text or the locally structured rendering.
    pub content: String,
    /// Short introduction, one sentence per line on the fallback path.
    pub summary: String,
}

impl ArticleDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            summary: summary.into(),
        }
    }

    /// Merge user-supplied fields over the draft, the way a post is created.
    ///
    /// Non-blank overrides win and are trimmed. The summary, whichever side
    /// it comes from, is flattened to a single line and cut to
    /// `summary_char_limit` characters.
    pub fn into_post(self, overrides: &PostOverrides, summary_char_limit: usize) -> ArticleDraft {
        let title = pick(overrides.title.as_deref()).unwrap_or(self.title);
        let content = pick(overrides.content.as_deref()).unwrap_or(self.content);
        let summary = pick(overrides.summary.as_deref()).unwrap_or(self.summary);
        ArticleDraft {
            title,
            content,
            summary: flatten_summary(&summary, summary_char_limit),
        }
    }
}

/// Optional values that replace draft fields when a post is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostOverrides {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

fn pick(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Single-line summary capped at `limit` characters.
pub fn flatten_summary(summary: &str, limit: usize) -> String {
    truncate_chars(&collapse_whitespace(summary), limit)
        .trim_end()
        .to_string()
}

/// First `limit` characters of `text` (never splits a code point).
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// One message of a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

/// The part of a chat completion response the pipeline reads.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of `choices[0].message.content`, if the service sent one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_draft_serialization() {
        let draft = ArticleDraft::new("T", "C", "S");
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"title":"T","content":"C","summary":"S"}"#);
    }

    #[test]
    fn test_default_draft_has_empty_fields() {
        let draft = ArticleDraft::default();
        assert_eq!(draft.title, "");
        assert_eq!(draft.content, "");
        assert_eq!(draft.summary, "");
    }

    #[test]
    fn test_into_post_prefers_non_blank_overrides() {
        let draft = ArticleDraft::new("Draft title", "Draft body", "Line one.\nLine two.");
        let overrides = PostOverrides {
            title: Some("  Mine  ".to_string()),
            summary: Some("   ".to_string()),
            content: None,
        };
        let post = draft.into_post(&overrides, 300);
        assert_eq!(post.title, "Mine");
        assert_eq!(post.content, "Draft body");
        assert_eq!(post.summary, "Line one. Line two.");
    }

    #[test]
    fn test_into_post_caps_summary() {
        let draft = ArticleDraft::new("t", "c", "あ".repeat(400));
        let post = draft.into_post(&PostOverrides::default(), 300);
        assert_eq!(post.summary.chars().count(), 300);
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.5,
            max_tokens: 2000,
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: "persona".to_string(),
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["messages"][0]["role"], "system");
    }

    #[test]
    fn test_chat_response_first_content() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"hi"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_content(), Some("hi"));
    }

    #[test]
    fn test_chat_response_without_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(response.first_content(), None);
    }

    #[test]
    fn test_draft_fields_missing_keys_default() {
        let fields: DraftFields = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(fields.title, "T");
        assert_eq!(fields.content, "");
        assert_eq!(fields.summary, "");
    }
}
