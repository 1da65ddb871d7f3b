use crate::{bucket_label, RULE};
use bucketguard_types::{RemediationReport, ScanReport};

/// Terminal summary printed after a scan.
pub fn render_scan_summary(report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    if report.findings.is_empty() {
        out.push_str("[OK] No security issues found! All scanned buckets are configured.\n");
    } else {
        out.push_str(&format!(
            "Found {} security issue(s):\n",
            report.findings.len()
        ));
        for f in &report.findings {
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                f.severity,
                bucket_label(f.bucket.as_deref()),
                f.issue
            ));
        }
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Terminal summary printed after remediation.
pub fn render_remediation_summary(report: &RemediationReport) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    let mode = if report.approve_mode {
        "apply"
    } else {
        "dry run"
    };
    out.push_str(&format!(
        "Remediation ({mode}): {} target(s)\n",
        report.targets
    ));
    for a in &report.actions {
        let bucket = bucket_label(a.bucket.as_deref());
        match &a.error {
            Some(err) => out.push_str(&format!("  [{}] {}: {}\n", a.status, bucket, err)),
            None => out.push_str(&format!("  [{}] {}\n", a.status, bucket)),
        }
    }
    let s = &report.summary;
    out.push_str(&format!(
        "applied={} failed={} dry_run={} skipped={}\n",
        s.applied, s.failed, s.dry_run, s.skipped
    ));
    out.push_str(RULE);
    out.push('\n');
    out
}
