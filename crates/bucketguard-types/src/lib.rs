//! Stable DTOs and IDs used across the bucketguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted scan and remediation reports
//! - the provider-facing bucket configuration shapes
//! - stable string IDs and codes
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod bucket;
pub mod explain;
pub mod ids;
pub mod receipt;
pub mod remediation;

pub use bucket::{EncryptionConfig, PublicAccessBlock};
pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use receipt::{
    Finding, FindingsDocument, ScanReport, ScanSummary, Severity, SERVICE_S3, TOOL_NAME,
};
pub use remediation::{
    Action, ActionError, ActionKind, ActionStatus, RemediationReport, RemediationSummary,
};
