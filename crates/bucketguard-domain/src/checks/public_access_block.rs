use crate::checks::utils::scan_error_finding;
use crate::model::{BucketModel, Observed};
use crate::policy::EffectiveConfig;
use bucketguard_types::{ids, Finding, Severity};
use serde_json::json;

pub const ISSUE_MISSING: &str = "No public access block configured";
pub const ISSUE_INCOMPLETE: &str = "Public access not fully blocked";

pub fn run(bucket: &BucketModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    if !cfg.check_enabled(ids::CHECK_S3_PUBLIC_ACCESS_BLOCK) {
        return;
    }
    let Some(observed) = &bucket.public_access_block else {
        return;
    };

    match observed {
        Observed::Present(config) if config.is_fully_blocked() => {}
        Observed::Present(config) => out.push(Finding {
            bucket: Some(bucket.name.clone()),
            issue: ISSUE_INCOMPLETE.to_string(),
            severity: Severity::Critical,
            check_id: Some(ids::CHECK_S3_PUBLIC_ACCESS_BLOCK.to_string()),
            code: Some(ids::CODE_PUBLIC_ACCESS_NOT_FULLY_BLOCKED.to_string()),
            details: Some(json!({ "unprotected_flags": config.unprotected_flags() })),
        }),
        Observed::Absent => out.push(Finding {
            bucket: Some(bucket.name.clone()),
            issue: ISSUE_MISSING.to_string(),
            severity: Severity::Critical,
            check_id: Some(ids::CHECK_S3_PUBLIC_ACCESS_BLOCK.to_string()),
            code: Some(ids::CODE_PUBLIC_ACCESS_BLOCK_MISSING.to_string()),
            details: None,
        }),
        Observed::Failed(fault) => out.push(scan_error_finding(
            &bucket.name,
            ids::CHECK_S3_PUBLIC_ACCESS_BLOCK,
            "scan bucket",
            fault,
        )),
    }
}
