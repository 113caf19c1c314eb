//! Typed errors for the price-intel library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::time::Duration;

use thiserror::Error;

use crate::types::product::Field;

/// Errors that can occur in extraction, synthesis, and collaborator calls.
///
/// None of these are fatal to the host page. Extraction and synthesis
/// degrade to empty or partial results; only collaborator calls surface
/// errors to the caller.
#[derive(Debug, Error)]
pub enum PriceIntelError {
    /// No selector matched a field. Non-fatal: the field keeps its zero value.
    #[error("no selector matched field: {field}")]
    ExtractionMiss { field: Field },

    /// URL matches no registered adapter
    #[error("unsupported site: {url}")]
    UnsupportedSite { url: String },

    /// No valid product appeared within the polling bound
    #[error("no product detected within {waited:?}")]
    PollTimeout { waited: Duration },

    /// Query rejected before synthesis
    #[error("input rejected: {reason}")]
    InputRejected { reason: String },

    /// Operation needs an authenticated session
    #[error("login required")]
    AuthRequired,

    /// Key-value store operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Backend API call failed or returned an error payload
    #[error("backend error: {0}")]
    Backend(String),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid backend URL
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result type alias for price-intel operations.
pub type Result<T> = std::result::Result<T, PriceIntelError>;
