//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_S3_PUBLIC_ACCESS_BLOCK: &str = "s3.public_access_block";
pub const CHECK_S3_DEFAULT_ENCRYPTION: &str = "s3.default_encryption";

// Codes: s3.public_access_block
pub const CODE_PUBLIC_ACCESS_BLOCK_MISSING: &str = "public_access_block_missing";
pub const CODE_PUBLIC_ACCESS_NOT_FULLY_BLOCKED: &str = "public_access_not_fully_blocked";

// Codes: s3.default_encryption
pub const CODE_ENCRYPTION_NOT_CONFIGURED: &str = "encryption_not_configured";

// Shared: the configuration read itself failed.
pub const CODE_SCAN_ERROR: &str = "scan_error";
