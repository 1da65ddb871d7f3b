use bucketguard_types::{ids, Severity};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckPolicy {
    pub enabled: bool,
}

impl CheckPolicy {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    /// Minimum severity that fails a scan. `NONE` never fails.
    pub fail_on: Severity,
    /// When present, only these buckets are scanned.
    pub allow_buckets: Option<BTreeSet<String>>,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        let mut checks = BTreeMap::new();
        checks.insert(
            ids::CHECK_S3_PUBLIC_ACCESS_BLOCK.to_string(),
            CheckPolicy::enabled(),
        );
        checks.insert(
            ids::CHECK_S3_DEFAULT_ENCRYPTION.to_string(),
            CheckPolicy::disabled(),
        );
        Self {
            fail_on: Severity::Critical,
            allow_buckets: None,
            checks,
        }
    }
}

impl EffectiveConfig {
    pub fn check_enabled(&self, check_id: &str) -> bool {
        self.checks.get(check_id).is_some_and(|p| p.enabled)
    }

    pub fn in_scope(&self, bucket: &str) -> bool {
        match &self.allow_buckets {
            Some(allow) => allow.contains(bucket),
            None => true,
        }
    }
}
