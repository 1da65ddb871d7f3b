use crate::{bucket_label, timestamp};
use bucketguard_types::{RemediationReport, ScanReport, Severity};

pub fn render_scan_markdown(report: &ScanReport) -> String {
    let mut out = String::new();

    out.push_str("# Bucketguard scan report\n\n");
    out.push_str(&format!(
        "- Generated: {}\n- Buckets scanned: {}\n- Findings: {}\n\n",
        timestamp(report.generated_at),
        report.scanned_count,
        report.summary.total_findings
    ));

    out.push_str("| Severity | Count |\n|---|---|\n");
    for sev in Severity::ALL.iter().rev() {
        out.push_str(&format!("| {} | {} |\n", sev, report.summary.count(*sev)));
    }
    out.push('\n');

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");
    for f in &report.findings {
        out.push_str(&format!(
            "- [{}] `{}`: {}",
            f.severity,
            bucket_label(f.bucket.as_deref()),
            f.issue
        ));
        if let Some(code) = &f.code {
            out.push_str(&format!(" (`{}`)", code));
        }
        out.push('\n');
    }

    out
}

pub fn render_remediation_markdown(report: &RemediationReport) -> String {
    let mut out = String::new();

    out.push_str("# Bucketguard remediation report\n\n");
    let mode = if report.approve_mode {
        "APPLY"
    } else {
        "DRY RUN"
    };
    out.push_str(&format!(
        "- Generated: {}\n- Mode: **{}**\n- Targets: {}\n\n",
        timestamp(report.generated_at),
        mode,
        report.targets
    ));

    let s = &report.summary;
    out.push_str("| Status | Count |\n|---|---|\n");
    out.push_str(&format!("| APPLIED | {} |\n", s.applied));
    out.push_str(&format!("| FAILED | {} |\n", s.failed));
    out.push_str(&format!("| DRY_RUN | {} |\n", s.dry_run));
    out.push_str(&format!("| SKIPPED | {} |\n\n", s.skipped));

    if report.actions.is_empty() {
        out.push_str("No CRITICAL findings to remediate.\n");
        return out;
    }

    out.push_str("## Actions\n\n");
    for a in &report.actions {
        out.push_str(&format!(
            "- [{}] `{}`: {}\n",
            a.status,
            bucket_label(a.bucket.as_deref()),
            a.issue
        ));
        if let Some(err) = &a.error {
            out.push_str(&format!("  - error: {}\n", err));
        }
    }

    out
}
