//! Drafting configuration.
//!
//! A [`DraftConfig`] is built once at startup (defaults, then an optional
//! YAML file, then CLI/env overrides) and handed to [`crate::Drafter`]
//! behind an `Arc`. Nothing mutates it afterwards.
//!
//! # YAML example
//!
//! ```yaml
//! model: gpt-4o-mini
//! request_timeout_secs: 20
//! heuristics:
//!   summary_sentences: 3
//!   overview_heading: Overview
//! ```

use crate::error::{DraftError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Default OpenAI-compatible chat completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Title used when the page title cannot be retrieved.
pub const NO_TITLE: &str = "タイトルなし";

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "あなたは難聴の子供の子育てをしている親向けに有益なネットの情報をまとめている記者です。\
     落ち着いた、やさしい語り口で書いてください。";

pub const DEFAULT_PROMPT_TEMPLATE: &str = "# 指示
以下の記事を読み、以下の情報をまとめてください。
- 記事のTitle
- 記事の紹介文
- 記事の詳細

# 指示詳細
記事のTitleは、記事の内容に基づいて端的な表現をあなたが考えてください。
記事の紹介文は、その記事が子育てをしている親にとってどのように有益かを300文字以内で簡潔に説明してください。
記事の詳細は、その記事の内容をわかりやすくまとめてください。ある程度詳細にまとめてほしいです。長文になる場合は、見出し(##)や箇条書き(-)を使って見やすくしてください。
記事本文に書かれていない情報は追加しないでください。推測で事実を作らないでください。

# アウトプット
以下のキーを含むJSONでTitleと紹介文と詳細を返してください。
- title: 記事のtitle
- summary: 記事の紹介文（300文字以内）
- content: 記事の詳細。contentはMarkdownの記法で書いてください。長すぎる場合は要約して。

# 記事本文
{article}";

/// Tuning knobs for the rule-based fallback summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Sentences taken for the short summary.
    pub summary_sentences: usize,
    /// Hard cap on summary lines.
    pub max_summary_lines: usize,
    /// Below this many sentences the summary is built from fixed-size chunks.
    pub min_sentences: usize,
    /// Chunk width in characters for the chunked summary.
    pub chunk_chars: usize,
    /// Bullets in the key points section.
    pub key_points: usize,
    /// Sentences per paragraph in the details section.
    pub paragraph_sentences: usize,
    pub overview_heading: String,
    pub key_points_heading: String,
    pub details_heading: String,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            summary_sentences: 4,
            max_summary_lines: 5,
            min_sentences: 2,
            chunk_chars: 80,
            key_points: 4,
            paragraph_sentences: 3,
            overview_heading: "概要".to_string(),
            key_points_heading: "ポイント".to_string(),
            details_heading: "詳細".to_string(),
        }
    }
}

/// Process-wide, read-only drafting configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Bearer credential for the summarization service. Empty or absent
    /// switches the pipeline to offline mode.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Instruction template; `{article}` is replaced by the article text.
    pub prompt_template: String,
    /// Characters of article text sent to the service.
    pub prompt_char_limit: usize,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Ceiling applied to every assembled summary.
    pub summary_char_limit: usize,
    pub no_title: String,
    pub heuristics: HeuristicConfig,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            prompt_char_limit: 2000,
            request_timeout_secs: 15,
            connect_timeout_secs: 10,
            fetch_timeout_secs: 8,
            user_agent: format!("article_draft/{} (+drafting bot)", env!("CARGO_PKG_VERSION")),
            summary_char_limit: 300,
            no_title: NO_TITLE.to_string(),
            heuristics: HeuristicConfig::default(),
        }
    }
}

impl fmt::Debug for DraftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_char_limit", &self.prompt_char_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("summary_char_limit", &self.summary_char_limit)
            .field("heuristics", &self.heuristics)
            .finish()
    }
}

impl DraftConfig {
    /// Load a config from a YAML file. Keys that are not present keep their
    /// defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| DraftError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|e| DraftError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "Loaded drafting configuration");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// The credential, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
