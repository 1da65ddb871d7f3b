//! Shared test utilities for the bucketguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`).

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Only the root `generated_at` is replaced. Finding `details` carry raw provider
/// payloads and are never rewritten, whatever keys they contain.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut()
        && obj.contains_key("generated_at")
    {
        obj.insert(
            "generated_at".to_string(),
            Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
        );
    }
    value
}
