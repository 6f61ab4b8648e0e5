//! Error types for the fetch and resolution layers.

use thiserror::Error;

/// Errors raised by the page fetcher.
///
/// No retry happens at this layer; fallback across strategies and embed
/// variants is the resolver chain's responsibility.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors raised inside a single resolution strategy.
///
/// The chain catches these, logs them and moves on; they never abort a
/// resolution call.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("expected pattern not found: {0}")]
    ExtractionMiss(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
