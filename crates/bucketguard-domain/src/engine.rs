use crate::checks;
use crate::model::{BucketModel, InventoryModel};
use crate::policy::EffectiveConfig;
use crate::report::{saturating_count, DomainReport};
use bucketguard_types::{Finding, Severity};

/// Evaluate every collected bucket. Findings keep listing order, then check order.
pub fn evaluate(model: &InventoryModel, cfg: &EffectiveConfig) -> DomainReport {
    let mut findings: Vec<Finding> = Vec::new();
    for bucket in &model.buckets {
        checks::run_all(bucket, cfg, &mut findings);
    }

    let breached = threshold_breached(&findings, cfg.fail_on);

    DomainReport {
        scanned_count: saturating_count(model.buckets.len()),
        findings,
        breached,
    }
}

/// Findings for a single bucket.
pub fn evaluate_bucket(bucket: &BucketModel, cfg: &EffectiveConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    checks::run_all(bucket, cfg, &mut findings);
    findings
}

/// True when at least one finding is at or above `fail_on`. `NONE` never fails.
pub fn threshold_breached(findings: &[Finding], fail_on: Severity) -> bool {
    if fail_on == Severity::None {
        return false;
    }
    findings
        .iter()
        .map(|f| f.severity)
        .max()
        .is_some_and(|worst| worst >= fail_on)
}
