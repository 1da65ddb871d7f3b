use crate::checks::utils::scan_error_finding;
use crate::model::{BucketModel, Observed};
use crate::policy::EffectiveConfig;
use bucketguard_types::{ids, Finding, Severity};

pub const ISSUE_NOT_CONFIGURED: &str = "Default encryption not configured";

pub fn run(bucket: &BucketModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    if !cfg.check_enabled(ids::CHECK_S3_DEFAULT_ENCRYPTION) {
        return;
    }
    let Some(observed) = &bucket.encryption else {
        return;
    };

    let missing = match observed {
        Observed::Present(config) => !config.is_enabled(),
        Observed::Absent => true,
        Observed::Failed(fault) => {
            out.push(scan_error_finding(
                &bucket.name,
                ids::CHECK_S3_DEFAULT_ENCRYPTION,
                "read default encryption",
                fault,
            ));
            return;
        }
    };

    if missing {
        out.push(Finding {
            bucket: Some(bucket.name.clone()),
            issue: ISSUE_NOT_CONFIGURED.to_string(),
            severity: Severity::Medium,
            check_id: Some(ids::CHECK_S3_DEFAULT_ENCRYPTION.to_string()),
            code: Some(ids::CODE_ENCRYPTION_NOT_CONFIGURED.to_string()),
            details: None,
        });
    }
}
