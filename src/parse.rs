//! Lenient recovery of the draft object from a model reply.
//!
//! Models wrap JSON in markdown fences, put prose around it and emit raw
//! newlines inside string values. [`parse_draft_json`] tries, in order:
//!
//! 1. the reply with any surrounding code fence removed
//! 2. the same text with raw control characters escaped inside strings
//! 3. the slice from the first `{` to the last `}` (both variants again)
//!
//! Step 3 picks the wrong span when the reply has braces in its prose, and
//! then either fails or yields an unintended object. It stays this lenient
//! because tightening it changes how often drafts fall back.

use crate::error::{DraftError, Result};
use crate::models::DraftFields;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt::Write;

/// Parse the model's reply into [`DraftFields`].
///
/// Missing keys become empty strings; only a reply with no recoverable JSON
/// object is an error.
pub fn parse_draft_json(raw: &str) -> Result<DraftFields> {
    let cleaned = strip_code_fence(raw);
    let object = match parse_object(&cleaned) {
        Ok(object) => object,
        Err(primary) => brace_slice(&cleaned)
            .and_then(|candidate| parse_object(candidate).ok())
            .ok_or(DraftError::MalformedResponse(primary))?,
    };
    Ok(DraftFields {
        title: text_field(&object, "title"),
        content: text_field(&object, "content"),
        summary: text_field(&object, "summary"),
    })
}

/// Remove a markdown code fence wrapped around `text`.
///
/// An opening fence loses its whole first line (so ```` ```json ```` goes
/// too); a closing fence is dropped from the end. Text without fences is
/// only trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        trimmed = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = trimmed.strip_suffix("```") {
        trimmed = rest;
    }
    trimmed.trim().to_string()
}

fn brace_slice(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (last > first).then(|| &text[first..=last])
}

fn parse_object(candidate: &str) -> std::result::Result<Map<String, Value>, String> {
    let value = serde_json::from_str::<Value>(candidate)
        .or_else(|primary| {
            let escaped = escape_control_chars(candidate);
            match escaped {
                Cow::Owned(ref fixed) => serde_json::from_str::<Value>(fixed).map_err(|_| primary),
                Cow::Borrowed(_) => Err(primary),
            }
        })
        .map_err(|e| e.to_string())?;
    match value {
        Value::Object(object) => Ok(object),
        other => Err(format!("expected a JSON object, got {}", kind(&other))),
    }
}

// Scalars render as text; containers and null count as missing.
fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Escape raw control characters that appear inside JSON string literals.
fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| c.is_control()) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
