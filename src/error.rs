//! Error types for the drafting pipeline.
//!
//! [`DraftError`] covers everything that can go wrong while fetching a page,
//! talking to the summarization service or decoding its reply. None of these
//! reach the caller of [`crate::Drafter::build_draft`]: the assembler logs
//! them and folds them into a [`crate::FallbackReason`]. They are returned
//! as-is from setup code (config loading, client construction).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for drafting operations.
#[derive(Error, Debug)]
pub enum DraftError {
    /// Transport-level failures from reqwest: DNS, connect, TLS, body read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request exceeded its deadline.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The summarization service answered with a non-200 status.
    #[error("Summarization service returned {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    /// The service reply could not be turned into a draft object.
    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    /// The call was abandoned because the interrupt handle fired.
    #[error("Summarization interrupted")]
    Interrupted,

    /// Configuration file missing or invalid.
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Local I/O, e.g. while writing drafts to disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A draft could not be serialized for output.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl DraftError {
    /// Maps a reqwest error to [`DraftError::Timeout`] when it is one.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: u64) -> Self {
        if err.is_timeout() {
            DraftError::Timeout { timeout }
        } else {
            DraftError::Http(err)
        }
    }
}

/// Convenience alias for `std::result::Result<T, DraftError>`.
pub type Result<T> = std::result::Result<T, DraftError>;
