//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a finding.
    pub before: &'static str,
    /// Configuration that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_S3_PUBLIC_ACCESS_BLOCK => Some(explain_public_access_block()),
        ids::CHECK_S3_DEFAULT_ENCRYPTION => Some(explain_default_encryption()),

        // Codes
        ids::CODE_PUBLIC_ACCESS_BLOCK_MISSING => Some(explain_public_access_block_missing()),
        ids::CODE_PUBLIC_ACCESS_NOT_FULLY_BLOCKED => Some(explain_not_fully_blocked()),
        ids::CODE_ENCRYPTION_NOT_CONFIGURED => Some(explain_encryption_not_configured()),
        ids::CODE_SCAN_ERROR => Some(explain_scan_error()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_S3_PUBLIC_ACCESS_BLOCK,
        ids::CHECK_S3_DEFAULT_ENCRYPTION,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_PUBLIC_ACCESS_BLOCK_MISSING,
        ids::CODE_PUBLIC_ACCESS_NOT_FULLY_BLOCKED,
        ids::CODE_ENCRYPTION_NOT_CONFIGURED,
        ids::CODE_SCAN_ERROR,
    ]
}

// --- Check-level explanations ---

fn explain_public_access_block() -> Explanation {
    Explanation {
        title: "Block Public Access",
        description: "\
Verifies that every bucket has a public access block with all four protections enabled:
BlockPublicAcls, IgnorePublicAcls, BlockPublicPolicy and RestrictPublicBuckets.

A bucket without the block, or with any flag missing or false, can be exposed by a
single permissive ACL or bucket policy. These findings are CRITICAL and are the only
findings `bucketguard remediate` acts on.",
        remediation: "\
Run `bucketguard remediate` to review the planned changes, then re-run it with
`--approve` to enforce all four flags. The write is a full overwrite of the block, so
re-running it against an already protected bucket is safe.",
        examples: ExamplePair {
            before: r#"{
  "BlockPublicAcls": true,
  "IgnorePublicAcls": false,
  "BlockPublicPolicy": true,
  "RestrictPublicBuckets": true
}"#,
            after: r#"{
  "BlockPublicAcls": true,
  "IgnorePublicAcls": true,
  "BlockPublicPolicy": true,
  "RestrictPublicBuckets": true
}"#,
        },
    }
}

fn explain_default_encryption() -> Explanation {
    Explanation {
        title: "Default Encryption",
        description: "\
Verifies that every bucket has a default server-side encryption rule.

Objects written without an explicit encryption header are stored unencrypted when no
default rule exists. This check is advisory (MEDIUM) and disabled unless enabled in
bucketguard.toml:

    [checks.\"s3.default_encryption\"]
    enabled = true",
        remediation: "\
Configure a default encryption rule on the bucket. `AES256` (SSE-S3) needs no key
management; `aws:kms` adds key-level access control and audit trails.",
        examples: ExamplePair {
            before: r#"{ "name": "reports" }"#,
            after: r#"{ "name": "reports", "encryption": { "algorithm": "aws:kms" } }"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_public_access_block_missing() -> Explanation {
    let mut exp = explain_public_access_block();
    exp.title = "No Public Access Block Configured";
    exp.examples.before = r#"(no public access block configuration)"#;
    exp
}

fn explain_not_fully_blocked() -> Explanation {
    let mut exp = explain_public_access_block();
    exp.title = "Public Access Not Fully Blocked";
    exp
}

fn explain_encryption_not_configured() -> Explanation {
    let mut exp = explain_default_encryption();
    exp.title = "Default Encryption Not Configured";
    exp
}

fn explain_scan_error() -> Explanation {
    Explanation {
        title: "Bucket Could Not Be Scanned",
        description: "\
The provider refused or failed the configuration read for this bucket (for example
AccessDenied or throttling). The bucket is reported as HIGH rather than silently
skipped, and the raw provider error is kept in the finding details.

The rest of the scan is unaffected.",
        remediation: "\
Check the error code in the finding details. For AccessDenied, grant the scanning
identity read access to the bucket's public access block and encryption settings, then
re-run the scan. Transient errors usually clear on a retry.",
        examples: ExamplePair {
            before: r#"{ "code": "AccessDenied", "message": "Access Denied" }"#,
            after: r#"(read succeeds; the bucket is evaluated normally)"#,
        },
    }
}
