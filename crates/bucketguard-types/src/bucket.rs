use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The provider's public-access-block configuration for a bucket.
///
/// Every flag is optional on the wire: a missing flag and an explicit `false` are both
/// non-compliant, but they are kept distinct so diagnostics can report what was read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_public_acls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_public_acls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_public_policy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_public_buckets: Option<bool>,
}

impl PublicAccessBlock {
    /// All four protections explicitly enabled. This is the only remediation target shape.
    pub const fn enforced() -> Self {
        Self {
            block_public_acls: Some(true),
            ignore_public_acls: Some(true),
            block_public_policy: Some(true),
            restrict_public_buckets: Some(true),
        }
    }

    /// Wire names paired with their values, in canonical order.
    pub fn flags(&self) -> [(&'static str, Option<bool>); 4] {
        [
            ("BlockPublicAcls", self.block_public_acls),
            ("IgnorePublicAcls", self.ignore_public_acls),
            ("BlockPublicPolicy", self.block_public_policy),
            ("RestrictPublicBuckets", self.restrict_public_buckets),
        ]
    }

    /// Compliant iff all four flags are explicitly `true`.
    pub fn is_fully_blocked(&self) -> bool {
        self.flags().iter().all(|(_, v)| *v == Some(true))
    }

    /// Names of the flags that are missing or `false`.
    pub fn unprotected_flags(&self) -> Vec<&'static str> {
        self.flags()
            .iter()
            .filter(|(_, v)| *v != Some(true))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Default server-side encryption rule of a bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EncryptionConfig {
    /// `AES256`, `aws:kms`, ... Missing or empty means no default encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl EncryptionConfig {
    pub fn is_enabled(&self) -> bool {
        self.algorithm
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    }
}
