//! Typed errors for the portflow library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). None of the analysis
//! errors reach the caller of [`Analyzer::analyze`](crate::Analyzer::analyze):
//! they are logged and the pipeline degrades to the next strategy.

use thiserror::Error;

use crate::types::ContentCategory;

/// Errors raised inside the analysis pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// No rule matched the input; it is treated as `unknown`
    #[error("could not determine a category for: {input}")]
    DetectionAmbiguous { input: String },

    /// An extractor could not produce content
    #[error("extraction failed for {category}: {reason}")]
    ExtractionFailed {
        category: ContentCategory,
        reason: String,
    },

    /// The remote analysis service could not be reached
    #[error("remote analysis service unavailable: {0}")]
    RemoteServiceUnavailable(String),

    /// The remote analysis service answered with an error or a bad payload
    #[error("remote analysis service error{}: {message}", status_suffix(.status))]
    RemoteServiceError {
        status: Option<u16>,
        message: String,
    },

    /// The language model answered with nothing usable
    #[error("malformed model response: {0}")]
    ModelResponseMalformed(String),

    /// Persistence backend unreachable or rejected a write
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Error type returned by a single generation strategy attempt.
pub type StrategyError = AnalysisError;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised by a [`PortfolioStore`](crate::traits::store::PortfolioStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("store returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered successfully but with an unexpected shape
    #[error("unexpected store response: {0}")]
    Unexpected(String),

    /// Slug, id or path unsafe to use as a storage key
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the publish/fetch gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Both the remote and the offline store failed
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[source] StoreError),

    /// No portfolio with this slug exists in any store
    #[error("portfolio not found: {slug}")]
    NotFound { slug: String },
}

/// Invalid configuration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
