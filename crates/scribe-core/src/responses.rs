//! Response documents written by the `scribe` binary, one per input line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one batch request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Non-fatal loader errors across every requested object.
    pub loading_errors: Vec<String>,
    /// Docstring diagnostics keyed by object path.
    pub parsing_errors: BTreeMap<String, Vec<String>>,
    /// One serialized tree per object that resolved.
    pub objects: Vec<Value>,
}

impl Response {
    /// Record diagnostics for a path; empty lists are skipped.
    pub fn add_parsing_errors(&mut self, path: &str, errors: &[String]) {
        if errors.is_empty() {
            return;
        }
        self.parsing_errors
            .entry(path.to_string())
            .or_default()
            .extend(errors.iter().cloned());
    }
}

/// Emitted instead of a [`Response`] when a whole line fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// The error's cause chain, outermost first.
    pub traceback: String,
}
