//! # article_draft
//!
//! Turns an article URL into a draft post: a title, a markdown body and a
//! short summary. The text is summarized by an OpenAI-compatible chat
//! completion service when a credential is configured, and by local
//! sentence-based heuristics otherwise or whenever the service fails.
//!
//! ```no_run
//! use article_draft::{DraftConfig, Drafter};
//!
//! # async fn run() -> article_draft::Result<()> {
//! let drafter = Drafter::new(DraftConfig::default())?;
//! let draft = drafter.build_draft("https://example.com/news/1").await;
//! println!("{}\n\n{}", draft.title, draft.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Fetch**: title and main text from the page ([`fetch`])
//! 2. **Normalize**: line endings, figure references, whitespace ([`normalize`])
//! 3. **Summarize**: external service ([`api`], [`prompt`], [`parse`]) or
//!    local heuristics ([`heuristic`], [`segment`])
//! 4. **Assemble**: bound the summary and log the result ([`draft`])

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
pub mod fetch;
pub mod heuristic;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod parse;
pub mod prompt;
pub mod segment;
pub mod utils;

pub use api::{AskAsync, ChatClient, Interrupt};
pub use config::{DraftConfig, HeuristicConfig};
pub use draft::{DraftOutcome, DraftPath, Drafter, FallbackReason};
pub use error::{DraftError, Result};
pub use models::{ArticleDraft, PostOverrides};
