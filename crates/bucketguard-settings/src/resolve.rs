use crate::model::BucketguardConfigV1;
use anyhow::Context;
use bucketguard_domain::policy::EffectiveConfig;
use bucketguard_types::{explain, Severity};
use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_NARRATIVE_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_NARRATIVE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 30;

/// Values given on the command line. `None` defers to the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub fail_on: Option<Severity>,
    pub allow_buckets: Option<Vec<String>>,
    /// `--narrate`: force the narrative on. There is no flag to force it off.
    pub narrate: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrativeSettings {
    pub enabled: bool,
    pub model: String,
    pub api_key_env: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: DEFAULT_NARRATIVE_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoint: DEFAULT_NARRATIVE_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_NARRATIVE_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub narrative: NarrativeSettings,
}

pub fn resolve_config(
    cfg: BucketguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let mut effective = EffectiveConfig::default();

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        if !explain::all_check_ids().contains(&check_id.as_str()) {
            anyhow::bail!(
                "unknown check id: {check_id} (expected one of {})",
                explain::all_check_ids().join(", ")
            );
        }
        if let (Some(enabled), Some(entry)) = (cc.enabled, effective.checks.get_mut(check_id)) {
            entry.enabled = enabled;
        }
    }

    if let Some(fail_on) = overrides.fail_on {
        effective.fail_on = fail_on;
    } else if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = fail_on_s
            .parse()
            .with_context(|| format!("invalid fail_on: {fail_on_s}"))?;
    }

    let narrative = resolve_narrative(&cfg, overrides.narrate)?;

    // A list given on the command line replaces the file's, even when it is empty.
    effective.allow_buckets = normalize_allowlist(overrides.allow_buckets.or(cfg.allow_buckets));

    Ok(ResolvedConfig {
        effective,
        narrative,
    })
}

/// Trim entries and drop blanks; an empty list means no filter.
fn normalize_allowlist(names: Option<Vec<String>>) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = names?
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

fn resolve_narrative(cfg: &BucketguardConfigV1, narrate: bool) -> anyhow::Result<NarrativeSettings> {
    let mut settings = NarrativeSettings::default();
    if let Some(nc) = &cfg.narrative {
        if let Some(enabled) = nc.enabled {
            settings.enabled = enabled;
        }
        if let Some(model) = &nc.model {
            settings.model = model.clone();
        }
        if let Some(env) = &nc.api_key_env {
            if env.trim().is_empty() {
                anyhow::bail!("narrative.api_key_env must not be empty");
            }
            settings.api_key_env = env.clone();
        }
        if let Some(endpoint) = &nc.endpoint {
            settings.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(secs) = nc.timeout_secs {
            if secs == 0 {
                anyhow::bail!("narrative.timeout_secs must be greater than zero");
            }
            settings.timeout = Duration::from_secs(secs);
        }
    }
    if narrate {
        settings.enabled = true;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use bucketguard_types::ids;

    fn resolve(text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
        resolve_config(parse_config_toml(text)?, overrides)
    }

    #[test]
    fn empty_config_uses_defaults() {
        let resolved = resolve("", Overrides::default()).expect("resolve");
        assert_eq!(resolved.effective.fail_on, Severity::Critical);
        assert!(resolved.effective.allow_buckets.is_none());
        assert!(
            resolved
                .effective
                .check_enabled(ids::CHECK_S3_PUBLIC_ACCESS_BLOCK)
        );
        assert!(
            !resolved
                .effective
                .check_enabled(ids::CHECK_S3_DEFAULT_ENCRYPTION)
        );
        assert_eq!(resolved.narrative, NarrativeSettings::default());
    }

    #[test]
    fn file_values_apply() {
        let resolved = resolve(
            r#"
fail_on = "high"
allow_buckets = ["logs", " data "]

[checks."s3.default_encryption"]
enabled = true

[narrative]
enabled = true
model = "gemini-1.5-pro"
api_key_env = "BUCKETGUARD_AI_KEY"
endpoint = "http://localhost:8080/v1beta/"
timeout_secs = 5
"#,
            Overrides::default(),
        )
        .expect("resolve");

        assert_eq!(resolved.effective.fail_on, Severity::High);
        let allow: Vec<_> = resolved
            .effective
            .allow_buckets
            .clone()
            .expect("allowlist")
            .into_iter()
            .collect();
        assert_eq!(allow, vec!["data", "logs"]);
        assert!(
            resolved
                .effective
                .check_enabled(ids::CHECK_S3_DEFAULT_ENCRYPTION)
        );
        assert!(resolved.narrative.enabled);
        assert_eq!(resolved.narrative.model, "gemini-1.5-pro");
        assert_eq!(resolved.narrative.api_key_env, "BUCKETGUARD_AI_KEY");
        assert_eq!(resolved.narrative.endpoint, "http://localhost:8080/v1beta");
        assert_eq!(resolved.narrative.timeout, Duration::from_secs(5));
    }

    #[test]
    fn cli_overrides_win() {
        let resolved = resolve(
            "fail_on = \"LOW\"\nallow_buckets = [\"logs\"]\n",
            Overrides {
                fail_on: Some(Severity::None),
                allow_buckets: Some(vec!["data".to_string()]),
                narrate: true,
            },
        )
        .expect("resolve");
        assert_eq!(resolved.effective.fail_on, Severity::None);
        assert!(resolved.effective.in_scope("data"));
        assert!(!resolved.effective.in_scope("logs"));
        assert!(resolved.narrative.enabled);
    }

    #[test]
    fn blank_allowlist_means_no_filter() {
        let resolved = resolve(
            "",
            Overrides {
                allow_buckets: Some(vec![" ".to_string(), String::new()]),
                ..Overrides::default()
            },
        )
        .expect("resolve");
        assert!(resolved.effective.allow_buckets.is_none());
    }

    #[test]
    fn empty_cli_allowlist_clears_file_allowlist() {
        let resolved = resolve(
            "allow_buckets = [\"logs\"]\n",
            Overrides {
                allow_buckets: Some(Vec::new()),
                ..Overrides::default()
            },
        )
        .expect("resolve");
        assert!(resolved.effective.allow_buckets.is_none());
        assert!(resolved.effective.in_scope("data"));
    }

    #[test]
    fn unknown_check_is_rejected() {
        let err = resolve("[checks.\"s3.versioning\"]\nenabled = true\n", Overrides::default())
            .expect_err("unknown check");
        assert!(err.to_string().contains("unknown check id: s3.versioning"));
    }

    #[test]
    fn invalid_severity_is_rejected() {
        let err = resolve("fail_on = \"severe\"\n", Overrides::default())
            .expect_err("invalid severity");
        assert!(format!("{err:#}").contains("invalid fail_on: severe"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(resolve("[narrative]\ntimeout_secs = 0\n", Overrides::default()).is_err());
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(parse_config_toml("fail_on = ").is_err());
    }
}
