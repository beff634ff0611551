//! Draft assembly: fetch, normalize, summarize (externally or locally), bound.
//!
//! [`Drafter`] owns everything a draft needs: the shared config, the page
//! fetcher, the service client and the interrupt handle. Each call to
//! [`Drafter::build_draft`] runs the stages in order and always returns a
//! usable [`ArticleDraft`]. Failures on the external path are logged and
//! recorded as a [`FallbackReason`] on the [`DraftOutcome`].

use crate::api::{AskAsync, ChatClient, Interrupt};
use crate::config::DraftConfig;
use crate::error::{DraftError, Result};
use crate::fetch::PageFetcher;
use crate::heuristic;
use crate::models::{ArticleDraft, FetchedPage};
use crate::normalize::normalize_body;
use crate::parse::{parse_draft_json, strip_code_fence};
use crate::prompt::build_prompt;
use crate::utils::preview;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Why a draft was produced locally instead of by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No non-blank credential is configured.
    NoCredential,
    /// The page yielded no text to summarize.
    EmptyText,
    /// The interrupt handle fired before or during the call.
    Interrupted,
    /// Transport failure, timeout or non-200 status.
    ServiceUnavailable,
    /// The reply held no recoverable draft object.
    MalformedResponse,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FallbackReason::NoCredential => "no-credential",
            FallbackReason::EmptyText => "empty-text",
            FallbackReason::Interrupted => "interrupted",
            FallbackReason::ServiceUnavailable => "service-unavailable",
            FallbackReason::MalformedResponse => "malformed-response",
        };
        f.write_str(label)
    }
}

impl From<&DraftError> for FallbackReason {
    fn from(err: &DraftError) -> Self {
        match err {
            DraftError::Interrupted => FallbackReason::Interrupted,
            DraftError::MalformedResponse(_) => FallbackReason::MalformedResponse,
            _ => FallbackReason::ServiceUnavailable,
        }
    }
}

/// Which stage produced the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPath {
    External,
    Fallback(FallbackReason),
}

impl fmt::Display for DraftPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftPath::External => f.write_str("external"),
            DraftPath::Fallback(reason) => write!(f, "fallback:{reason}"),
        }
    }
}

/// A draft together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOutcome {
    pub draft: ArticleDraft,
    pub path: DraftPath,
}

/// Builds article drafts from URLs.
///
/// Generic over the service client so tests can plug in canned replies;
/// the default is the reqwest-backed [`ChatClient`].
#[derive(Debug, Clone)]
pub struct Drafter<A = ChatClient> {
    config: Arc<DraftConfig>,
    fetcher: PageFetcher,
    asker: A,
    interrupt: Interrupt,
}

impl Drafter<ChatClient> {
    /// Build a drafter with HTTP clients configured from `config`.
    ///
    /// # Errors
    ///
    /// Fails only if an HTTP client cannot be constructed.
    pub fn new(config: DraftConfig) -> Result<Self> {
        Self::from_shared(Arc::new(config))
    }

    pub fn from_shared(config: Arc<DraftConfig>) -> Result<Self> {
        let interrupt = Interrupt::new();
        let asker = ChatClient::new(&config, interrupt.clone())?;
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self {
            config,
            fetcher,
            asker,
            interrupt,
        })
    }
}

impl<A> Drafter<A>
where
    A: AskAsync<Response = String>,
{
    /// Build a drafter around a custom service client.
    ///
    /// The drafter gets its own [`Interrupt`]; it is checked before every
    /// call but only aborts calls already in flight if `asker` watches it.
    pub fn with_asker(config: DraftConfig, asker: A) -> Result<Self> {
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            asker,
            interrupt: Interrupt::new(),
        })
    }

    /// Handle that abandons in-flight and future service calls.
    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// Produce a draft for `url`. Never fails.
    pub async fn build_draft(&self, url: &str) -> ArticleDraft {
        self.build_draft_traced(url).await.draft
    }

    /// Produce a draft for `url` and report which path produced it.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn build_draft_traced(&self, url: &str) -> DraftOutcome {
        let page = self.fetcher.fetch(url).await;
        let text = normalize_body(&page.raw_text);
        debug!(raw_len = page.raw_text.len(), text_len = text.len(), "Normalized article text");

        let (draft, path) = match self.external_draft(&page, &text).await {
            Ok(draft) => (draft, DraftPath::External),
            Err(reason) => (self.fallback_draft(&page, &text), DraftPath::Fallback(reason)),
        };
        let draft = self.bound(draft);

        info!(
            stage = %path,
            title = %preview(&draft.title),
            summary = %preview(&draft.summary),
            content = %preview(&draft.content),
            "Assembled draft"
        );
        DraftOutcome { draft, path }
    }

    async fn external_draft(
        &self,
        page: &FetchedPage,
        text: &str,
    ) -> std::result::Result<ArticleDraft, FallbackReason> {
        if self.config.credential().is_none() {
            debug!("No credential configured; drafting offline");
            return Err(FallbackReason::NoCredential);
        }
        if text.is_empty() {
            info!("No article text; drafting offline");
            return Err(FallbackReason::EmptyText);
        }
        if self.interrupt.is_triggered() {
            return Err(FallbackReason::Interrupted);
        }

        let prompt = build_prompt(&self.config.prompt_template, text, self.config.prompt_char_limit);
        let fields = self
            .asker
            .ask(&prompt)
            .await
            .and_then(|reply| parse_draft_json(&reply))
            .map_err(|e| {
                warn!(error = %e, "Summarization failed; using local draft");
                FallbackReason::from(&e)
            })?;

        let title = strip_code_fence(&fields.title);
        let title = if title.is_empty() {
            page.title.clone()
        } else {
            title
        };
        Ok(ArticleDraft {
            title,
            content: strip_code_fence(&fields.content),
            summary: strip_code_fence(&fields.summary),
        })
    }

    fn fallback_draft(&self, page: &FetchedPage, text: &str) -> ArticleDraft {
        let cfg = &self.config.heuristics;
        ArticleDraft {
            title: page.title.clone(),
            content: heuristic::structured_body(text, cfg),
            summary: heuristic::summary(text, cfg),
        }
    }

    // Summary ceiling shared by both paths.
    fn bound(&self, mut draft: ArticleDraft) -> ArticleDraft {
        draft.summary = heuristic::bound_summary(&draft.summary, self.config.summary_char_limit);
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl Canned {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn err(err: DraftError) -> Self {
            Self {
                reply: Err(err),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl AskAsync for Canned {
        type Response = String;

        async fn ask(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(DraftError::Interrupted) => Err(DraftError::Interrupted),
                Err(DraftError::MalformedResponse(m)) => Err(DraftError::MalformedResponse(m.clone())),
                Err(_) => Err(DraftError::ServiceStatus {
                    status: 503,
                    body: String::new(),
                }),
            }
        }
    }

    fn keyed() -> DraftConfig {
        DraftConfig {
            api_key: Some("sk-test".to_string()),
            ..DraftConfig::default()
        }
    }

    fn page(text: &str) -> FetchedPage {
        FetchedPage {
            title: "Page".to_string(),
            raw_text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_external_reply_is_cleaned() {
        let reply = "```json\n{\"title\":\"T\",\"content\":\"C\",\"summary\":\"S\"}\n```";
        let drafter = Drafter::with_asker(keyed(), Canned::ok(reply)).unwrap();
        let draft = drafter.external_draft(&page("Body."), "Body.").await.unwrap();
        assert_eq!(draft, ArticleDraft::new("T", "C", "S"));
        let prompts = drafter.asker.prompts.lock().unwrap();
        assert!(prompts[0].ends_with("Body."));
    }

    #[tokio::test]
    async fn test_empty_title_falls_back_to_page_title() {
        let drafter = Drafter::with_asker(keyed(), Canned::ok(r#"{"content":"C"}"#)).unwrap();
        let draft = drafter.external_draft(&page("Body."), "Body.").await.unwrap();
        assert_eq!(draft.title, "Page");
        assert_eq!(draft.summary, "");
    }

    #[tokio::test]
    async fn test_preconditions_short_circuit() {
        let drafter = Drafter::with_asker(DraftConfig::default(), Canned::ok("{}")).unwrap();
        let reason = drafter.external_draft(&page("x"), "x").await.unwrap_err();
        assert_eq!(reason, FallbackReason::NoCredential);

        let drafter = Drafter::with_asker(keyed(), Canned::ok("{}")).unwrap();
        let reason = drafter.external_draft(&page(""), "").await.unwrap_err();
        assert_eq!(reason, FallbackReason::EmptyText);

        drafter.interrupt_handle().trigger();
        let reason = drafter.external_draft(&page("x"), "x").await.unwrap_err();
        assert_eq!(reason, FallbackReason::Interrupted);
        assert!(drafter.asker.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_errors_map_to_reasons() {
        let cases = [
            (DraftError::Timeout { timeout: 15 }, FallbackReason::ServiceUnavailable),
            (
                DraftError::MalformedResponse("x".to_string()),
                FallbackReason::MalformedResponse,
            ),
            (DraftError::Interrupted, FallbackReason::Interrupted),
        ];
        for (err, expected) in cases {
            let drafter = Drafter::with_asker(keyed(), Canned::err(err)).unwrap();
            let reason = drafter.external_draft(&page("x"), "x").await.unwrap_err();
            assert_eq!(reason, expected);
        }
    }

    #[tokio::test]
    async fn test_non_json_reply_is_malformed() {
        let drafter = Drafter::with_asker(keyed(), Canned::ok("Sorry, no.")).unwrap();
        let reason = drafter.external_draft(&page("x"), "x").await.unwrap_err();
        assert_eq!(reason, FallbackReason::MalformedResponse);
    }

    #[test]
    fn test_fallback_uses_page_title_verbatim() {
        let drafter = Drafter::with_asker(DraftConfig::default(), Canned::ok("{}")).unwrap();
        let draft = drafter.fallback_draft(&page("A. B. C."), "A. B. C.");
        assert_eq!(draft.title, "Page");
        assert_eq!(draft.summary, "A.\nB.\nC.");
        assert!(draft.content.starts_with("## 概要"));
    }

    #[test]
    fn test_bound_keeps_every_summary_line_closed() {
        let drafter = Drafter::with_asker(DraftConfig::default(), Canned::ok("{}")).unwrap();
        let lines = vec!["これは要約の一行目で、ある程度の長さを持っています。"; 12].join("\n");
        let draft = drafter.bound(ArticleDraft::new("t", "c", lines));
        assert!(draft.summary.chars().count() <= 300);
        assert!(draft.summary.lines().count() > 1);
        assert!(draft.summary.lines().all(|line| line.ends_with('。')));

        let draft = drafter.bound(ArticleDraft::new("t", "c", "あ".repeat(400)));
        assert_eq!(draft.summary.chars().count(), 300);
        assert!(draft.summary.ends_with('。'));
    }

    #[test]
    fn test_path_labels() {
        assert_eq!(DraftPath::External.to_string(), "external");
        assert_eq!(
            DraftPath::Fallback(FallbackReason::NoCredential).to_string(),
            "fallback:no-credential"
        );
    }
}
