//! Rendering utilities for human-facing surfaces (Markdown, terminal).

#![forbid(unsafe_code)]

mod markdown;
mod text;

pub use markdown::{render_remediation_markdown, render_scan_markdown};
pub use text::{render_remediation_summary, render_scan_summary};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const RULE: &str = "=======================================================";

fn timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

/// Bucket label for output; findings without a bucket render as `<unknown>`.
fn bucket_label(bucket: Option<&str>) -> &str {
    match bucket.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => "<unknown>",
    }
}
