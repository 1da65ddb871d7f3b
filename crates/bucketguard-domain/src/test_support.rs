use crate::model::{BucketModel, Observed};
use crate::policy::EffectiveConfig;
use bucketguard_types::{
    Action, ActionKind, ActionStatus, Finding, PublicAccessBlock, Severity,
};

pub fn config() -> EffectiveConfig {
    EffectiveConfig::default()
}

pub fn bucket_with_pab(name: &str, pab: Observed<PublicAccessBlock>) -> BucketModel {
    BucketModel {
        name: name.to_string(),
        public_access_block: Some(pab),
        encryption: None,
    }
}

/// `IgnorePublicAcls` is off; the other three are on.
pub fn partial_pab() -> PublicAccessBlock {
    PublicAccessBlock {
        block_public_acls: Some(true),
        ignore_public_acls: Some(false),
        block_public_policy: Some(true),
        restrict_public_buckets: Some(true),
    }
}

pub fn finding(bucket: &str, severity: Severity) -> Finding {
    Finding {
        bucket: Some(bucket.to_string()),
        issue: format!("{} issue", severity),
        severity,
        check_id: None,
        code: None,
        details: None,
    }
}

pub fn finding_without_bucket(severity: Severity) -> Finding {
    Finding {
        bucket: None,
        ..finding("unused", severity)
    }
}

pub fn action_with_status(bucket: &str, status: ActionStatus) -> Action {
    Action {
        bucket: Some(bucket.to_string()),
        issue: "issue".to_string(),
        action_kind: ActionKind::PutPublicAccessBlock,
        requested_config: PublicAccessBlock::enforced(),
        status,
        error: None,
    }
}
