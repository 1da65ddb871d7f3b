use anyhow::Context;
use bucketguard_settings::{BucketguardConfigV1, Overrides, ResolvedConfig};

/// Parse and resolve configuration text. Empty text means built-in defaults.
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        BucketguardConfigV1::default()
    } else {
        bucketguard_settings::parse_config_toml(config_text).context("parse config")?
    };
    bucketguard_settings::resolve_config(cfg, overrides).context("resolve config")
}
