//! Cross-cutting error types for scribe.
//!
//! Loading errors (`LoadError`) live in `scribe-loader`, parser errors in
//! `scribe-parser`. A unified error is deferred to `scribe-cli` where all
//! crate errors converge.

use thiserror::Error;

/// Errors that can be raised while handling request and response documents.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request document is structurally invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
