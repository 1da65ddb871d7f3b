//! Use case orchestration for bucketguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, provider,
//! domain, narrative and render layers. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod config;
mod explain;
mod narrative;
mod remediate;
mod report;
mod scan;

pub use config::load_config;
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use bucketguard_narrative::NarrativeInput;
pub use narrative::{narrate, remediation_narrative_input, scan_narrative_input};
pub use remediate::{
    parse_findings_document, remediation_exit_code, run_remediate, RemediateInput,
};
pub use report::{
    parse_report_json, render_markdown, serialize_report, write_bytes, write_text, ReportVariant,
};
pub use scan::{collect_inventory, run_scan, scan_exit_code, ScanOutput};
