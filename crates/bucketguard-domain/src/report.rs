//! Aggregators: pure functions from per-resource results to summary reports.

use bucketguard_types::{
    Action, ActionStatus, Finding, RemediationReport, RemediationSummary, ScanReport, ScanSummary,
    Severity, SERVICE_S3, TOOL_NAME,
};
use time::OffsetDateTime;

/// Result of evaluating one inventory, before timestamps are attached.
#[derive(Clone, Debug)]
pub struct DomainReport {
    pub scanned_count: u32,
    pub findings: Vec<Finding>,
    /// At least one finding reaches the configured `fail_on` severity.
    pub breached: bool,
}

/// Report counts are `u32` on the wire; larger lengths clamp instead of wrapping.
pub(crate) fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

pub fn summarize_findings(findings: &[Finding]) -> ScanSummary {
    let mut summary = ScanSummary {
        total_findings: saturating_count(findings.len()),
        ..ScanSummary::default()
    };
    for f in findings {
        match f.severity {
            Severity::Critical => summary.critical = summary.critical.saturating_add(1),
            Severity::High => summary.high = summary.high.saturating_add(1),
            Severity::Medium => summary.medium = summary.medium.saturating_add(1),
            Severity::Low => summary.low = summary.low.saturating_add(1),
            Severity::None => summary.none = summary.none.saturating_add(1),
        }
    }
    summary
}

/// Assemble a scan report. Findings keep evaluation order.
pub fn build_scan_report(
    generated_at: OffsetDateTime,
    scanned_count: u32,
    findings: Vec<Finding>,
) -> ScanReport {
    let summary = summarize_findings(&findings);
    ScanReport {
        generated_at,
        service: SERVICE_S3.to_string(),
        scanner: TOOL_NAME.to_string(),
        scanned_count,
        findings,
        summary,
    }
}

/// Count terminal statuses. A `PENDING` action never reaches a report; it is not counted.
pub fn summarize_actions(actions: &[Action]) -> RemediationSummary {
    let mut summary = RemediationSummary::default();
    for a in actions {
        match a.status {
            ActionStatus::Applied => summary.applied = summary.applied.saturating_add(1),
            ActionStatus::Failed => summary.failed = summary.failed.saturating_add(1),
            ActionStatus::DryRun => summary.dry_run = summary.dry_run.saturating_add(1),
            ActionStatus::Skipped => summary.skipped = summary.skipped.saturating_add(1),
            ActionStatus::Pending => {}
        }
    }
    summary
}

pub fn build_remediation_report(
    generated_at: OffsetDateTime,
    approve_mode: bool,
    actions: Vec<Action>,
) -> RemediationReport {
    let summary = summarize_actions(&actions);
    RemediationReport {
        generated_at,
        service: SERVICE_S3.to_string(),
        remediator: TOOL_NAME.to_string(),
        approve_mode,
        targets: saturating_count(actions.len()),
        actions,
        summary,
    }
}
