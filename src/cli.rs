//! Command-line interface definitions for article_draft.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Service settings can come from flags, environment variables or a YAML
//! config file; flags and environment win over the file.

use article_draft::{DraftConfig, PostOverrides};
use clap::{Parser, ValueEnum};

/// How drafts are printed to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
}

/// Command-line arguments for the article_draft application.
///
/// # Examples
///
/// ```sh
/// # Offline draft (no credential)
/// article_draft https://example.com/news/1
///
/// # Service-backed drafts written to a directory
/// OPENAI_API_KEY=sk-... article_draft -j ./drafts https://a.example/1 https://b.example/2
///
/// # Override the title and print Markdown
/// article_draft --title "My headline" --format markdown https://example.com/news/1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Article URLs to draft
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Credential for the summarization service (empty = offline drafts)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name sent to the service
    #[arg(long, env = "ARTICLE_DRAFT_MODEL")]
    pub model: Option<String>,

    /// Chat completion endpoint URL
    #[arg(long, env = "ARTICLE_DRAFT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Page fetch timeout in seconds
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Service request timeout in seconds
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Service connect timeout in seconds
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Title to use instead of the drafted one
    #[arg(long)]
    pub title: Option<String>,

    /// Summary to use instead of the drafted one
    #[arg(long)]
    pub summary: Option<String>,

    /// Body to use instead of the drafted one
    #[arg(long)]
    pub content: Option<String>,

    /// Stdout format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output directory for one JSON file per draft
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

impl Cli {
    /// Apply flag/env values over a loaded config.
    pub fn apply_to(&self, config: &mut DraftConfig) {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.fetch_timeout {
            config.fetch_timeout_secs = secs;
        }
        if let Some(secs) = self.request_timeout {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = self.connect_timeout {
            config.connect_timeout_secs = secs;
        }
    }

    pub fn overrides(&self) -> PostOverrides {
        PostOverrides {
            title: self.title.clone(),
            summary: self.summary.clone(),
            content: self.content.clone(),
        }
    }
}
