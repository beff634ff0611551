//! Chat-completion API interaction.
//!
//! This module talks to an OpenAI-compatible chat completion endpoint:
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`ChatClient`]: reqwest-backed implementation with bearer auth
//! - [`Interrupt`]: Shared flag that abandons in-flight calls
//!
//! # Failure Policy
//!
//! Exactly one attempt per draft. The request timeout is layered over a
//! connect timeout; a non-200 status, a transport error, a timeout or an
//! interrupt all come back as [`DraftError`] values for the assembler to
//! fold into its fallback path. Nothing here retries.

use crate::config::DraftConfig;
use crate::error::{DraftError, Result};
use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its reply. The drafter
/// is generic over this so tests can substitute canned replies.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send a prompt and receive the model's reply.
    async fn ask(&self, prompt: &str) -> Result<Self::Response>;
}

/// Cancellation signal shared between the CLI and in-flight requests.
///
/// Once triggered it stays triggered: the call that was running fails with
/// [`DraftError::Interrupted`] and every later call fails the same way
/// without touching the network.
#[derive(Clone, Default)]
pub struct Interrupt {
    inner: Arc<InterruptState>,
}

#[derive(Default)]
struct InterruptState {
    fired: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.inner.fired.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// Resolves once [`Interrupt::trigger`] has been called.
    pub async fn triggered(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

impl fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupt")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}

/// reqwest client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
    timeout_secs: u64,
    interrupt: Interrupt,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ChatClient {
    /// Build a client from the drafting config.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed
    /// (e.g. the TLS backend cannot initialize).
    pub fn new(config: &DraftConfig, interrupt: Interrupt) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.credential().unwrap_or_default().to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
            timeout_secs: config.request_timeout_secs,
            interrupt,
        })
    }

    /// The request body sent for `prompt`.
    pub fn request_for(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        }
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_for(prompt))
            .send()
            .await
            .map_err(|e| DraftError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DraftError::from_reqwest(e, self.timeout_secs))?;

        if status != StatusCode::OK {
            return Err(DraftError::ServiceStatus {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            DraftError::MalformedResponse(format!("not a chat completion body: {e}"))
        })?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| {
                DraftError::MalformedResponse("choices[0].message.content is missing".to_string())
            })
    }
}

impl AskAsync for ChatClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<Self::Response> {
        if self.interrupt.is_triggered() {
            return Err(DraftError::Interrupted);
        }

        let t0 = Instant::now();
        let res = tokio::select! {
            res = self.send(prompt) => res,
            _ = self.interrupt.triggered() => Err(DraftError::Interrupted),
        };
        let dt = t0.elapsed();

        match &res {
            Ok(reply) => {
                info!(elapsed_ms = dt.as_millis(), reply_len = reply.len(), "API call succeeded");
                debug!(reply = %truncate_for_log(reply, 500), "AI raw response");
            }
            Err(e) => warn!(elapsed_ms = dt.as_millis(), error = %e, "API call failed"),
        }
        res
    }
}
