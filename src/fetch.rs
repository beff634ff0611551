//! Page retrieval and main-text extraction.
//!
//! The fetcher downloads the article URL twice, once for the title and once
//! for the text, each bounded by the fetch timeout and never retried. Any
//! failure (bad URL, DNS, timeout, non-2xx, undecodable body) is logged and
//! turned into the "no title" sentinel or an empty string.
//!
//! # Extraction
//!
//! Text is taken from every `<article>` element; pages without one (or with
//! empty ones) fall back to `<body>`. Script, style and template contents
//! are skipped and whitespace is collapsed to single spaces.

use crate::config::DraftConfig;
use crate::error::{DraftError, Result};
use crate::models::FetchedPage;
use crate::normalize::collapse_whitespace;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::{debug, info, instrument};
use url::Url;

const HIDDEN_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

const BLOCK_TAGS: [&str; 22] = [
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "article", "header", "footer", "blockquote", "pre", "table", "tr", "td", "th",
];

/// HTTP fetcher for article pages.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    timeout_secs: u64,
    no_title: String,
}

impl fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFetcher")
            .field("client", &"<reqwest::Client>")
            .field("timeout_secs", &self.timeout_secs)
            .field("no_title", &self.no_title)
            .finish()
    }
}

impl PageFetcher {
    /// Build a fetcher using the fetch timeout and user agent from `config`.
    pub fn new(config: &DraftConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            timeout_secs: config.fetch_timeout_secs,
            no_title: config.no_title.clone(),
        })
    }

    /// Retrieve title and article text with two independent requests.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &str) -> FetchedPage {
        let title = self.fetch_title(url).await;
        let raw_text = self.fetch_article_text(url).await;
        info!(title_len = title.chars().count(), text_len = raw_text.chars().count(), "Fetched page");
        FetchedPage { title, raw_text }
    }

    /// The page's `<title>`, or the "no title" sentinel.
    pub async fn fetch_title(&self, url: &str) -> String {
        match self.get_html(url).await {
            Ok(html) => {
                let document = Html::parse_document(&html);
                extract_title(&document).unwrap_or_else(|| self.no_title.clone())
            }
            Err(e) => {
                debug!(%url, error = %e, "Unable to fetch title");
                self.no_title.clone()
            }
        }
    }

    /// Main article text, or an empty string.
    pub async fn fetch_article_text(&self, url: &str) -> String {
        match self.get_html(url).await {
            Ok(html) => {
                let document = Html::parse_document(&html);
                extract_article_text(&document)
            }
            Err(e) => {
                debug!(%url, error = %e, "Unable to fetch article text");
                String::new()
            }
        }
    }

    async fn get_html(&self, url: &str) -> Result<String> {
        let parsed = parse_http_url(url)?;
        let response = self
            .client
            .get(parsed)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| DraftError::from_reqwest(e, self.timeout_secs))?
            .error_for_status()?;
        let body = response
            .text()
            .await
            .map_err(|e| DraftError::from_reqwest(e, self.timeout_secs))?;
        debug!(bytes = body.len(), "Downloaded page");
        Ok(body)
    }
}

/// Accept only absolute http(s) URLs.
pub fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| DraftError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DraftError::InvalidUrl(format!(
            "unsupported scheme '{other}' (expected http or https)"
        ))),
    }
}

/// Trimmed text of the first `<title>` element, if non-empty.
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

/// Text of all `<article>` elements, else of `<body>`, else empty.
pub fn extract_article_text(document: &Html) -> String {
    let article = select_text(document, "article").join(" ");
    let article = collapse_whitespace(&article);
    if !article.is_empty() {
        return article;
    }
    select_text(document, "body")
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn select_text(document: &Html, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    document.select(&selector).map(visible_text).collect()
}

fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        if let Some(el) = node.value().as_element() {
            if BLOCK_TAGS.contains(&el.name()) {
                out.push(' ');
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }
    collapse_whitespace(&out)
}
