//! Unwrapping and parsing of model JSON output.
//!
//! Even with a response schema the backend occasionally wraps JSON in
//! markdown-style fences; strip them before handing the payload to serde.

use crate::error::ContentError;
use serde::de::DeserializeOwned;

/// Remove a leading ```` ```json ```` (or bare ```` ``` ````) fence and a
/// trailing ```` ``` ```` fence, if present, and trim whitespace.
pub fn strip_markdown_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    for prefix in ["```json", "```"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parse a model response into `T`, unwrapping fences first. A payload that
/// fails to parse is logged at debug for diagnostics and surfaced as a
/// malformed-response error naming the operation.
pub fn parse_json_payload<T: DeserializeOwned>(
    operation: &str,
    raw: &str,
) -> Result<T, ContentError> {
    let cleaned = strip_markdown_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        tracing::debug!(operation, payload = raw, "failed to parse model response");
        ContentError::MalformedResponse {
            operation: operation.to_string(),
            message: e.to_string(),
        }
    })
}
