//! Config parsing and policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{BucketguardConfigV1, CheckConfig, NarrativeConfig};
pub use resolve::{NarrativeSettings, Overrides, ResolvedConfig};

/// Parse `bucketguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<BucketguardConfigV1> {
    let cfg: BucketguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config: built-in defaults, then the file, then CLI overrides.
pub fn resolve_config(
    cfg: BucketguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
