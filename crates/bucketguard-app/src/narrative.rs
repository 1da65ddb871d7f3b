//! Narrative inputs built from reports, and the configured narrator call.

use bucketguard_narrative::{GeminiConfig, NarrativeInput};
use bucketguard_settings::NarrativeSettings;
use bucketguard_types::{ActionStatus, RemediationReport, ScanReport};

pub fn scan_narrative_input(report: &ScanReport) -> NarrativeInput {
    let s = &report.summary;
    let mut buckets: Vec<&str> = Vec::new();
    for name in report.findings.iter().filter_map(|f| f.bucket_name()) {
        if !buckets.contains(&name) {
            buckets.push(name);
        }
    }
    NarrativeInput::new("S3 bucket security scan")
        .count("Buckets scanned", report.scanned_count.into())
        .count("Total findings", s.total_findings.into())
        .count("Critical", s.critical.into())
        .count("High", s.high.into())
        .count("Medium", s.medium.into())
        .count("Low", s.low.into())
        .buckets(buckets)
}

/// Buckets still exposed after the run: failed or not yet applied.
pub fn remediation_narrative_input(report: &RemediationReport) -> NarrativeInput {
    let s = &report.summary;
    let buckets = report
        .actions
        .iter()
        .filter(|a| matches!(a.status, ActionStatus::Failed | ActionStatus::DryRun))
        .filter_map(|a| a.bucket.as_deref());
    NarrativeInput::new("S3 public access remediation run")
        .count("Targets", report.targets.into())
        .count("Applied", s.applied.into())
        .count("Failed", s.failed.into())
        .count("Dry run", s.dry_run.into())
        .count("Skipped", s.skipped.into())
        .buckets(buckets)
}

/// Produce the narrative text. Never fails; problems become placeholder text.
pub fn narrate(settings: &NarrativeSettings, input: &NarrativeInput) -> String {
    let config = GeminiConfig {
        endpoint: settings.endpoint.clone(),
        model: settings.model.clone(),
        api_key_env: settings.api_key_env.clone(),
        timeout: settings.timeout,
    };
    let api_key = bucketguard_narrative::api_key_from_env(&settings.api_key_env);
    bucketguard_narrative::summarize_with_gemini(&config, api_key, input)
}
