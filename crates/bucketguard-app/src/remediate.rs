//! The `remediate` use case: turn CRITICAL findings into public-access-block writes.

use anyhow::Context;
use bucketguard_domain::model::ProviderFault;
use bucketguard_domain::remediation;
use bucketguard_domain::report::build_remediation_report;
use bucketguard_provider::StorageProvider;
use bucketguard_types::{Action, ActionStatus, Finding, FindingsDocument, RemediationReport};
use time::OffsetDateTime;

/// Input for the remediate use case.
pub struct RemediateInput<'a> {
    /// Findings from a prior scan, in report order.
    pub findings: &'a [Finding],
    /// Apply changes. When false no provider call is made.
    pub approve: bool,
    /// Required when `approve` is set.
    pub provider: Option<&'a dyn StorageProvider>,
}

/// Parse a findings file. Malformed JSON is fatal for the run; entries without a
/// recognized severity are skipped.
pub fn parse_findings_document(text: &str) -> anyhow::Result<FindingsDocument> {
    serde_json::from_str(text).context("parse findings json")
}

pub fn run_remediate(input: RemediateInput<'_>) -> anyhow::Result<RemediationReport> {
    if input.approve && input.provider.is_none() {
        anyhow::bail!("approve mode requires a storage provider");
    }

    let provider = input.provider;
    let actions = remediation::remediate(input.findings, input.approve, |bucket, config| {
        let Some(provider) = provider else {
            return Err(ProviderFault::Unexpected(
                "no storage provider configured".to_string(),
            ));
        };
        provider
            .put_public_access_block(bucket, config)
            .map_err(ProviderFault::from)
    });
    log_actions(&actions);

    Ok(build_remediation_report(
        OffsetDateTime::now_utc(),
        input.approve,
        actions,
    ))
}

fn log_actions(actions: &[Action]) {
    for a in actions {
        let bucket = a.bucket.as_deref().unwrap_or("<unknown>");
        match (a.status, &a.error) {
            (ActionStatus::DryRun, _) => {
                tracing::info!(bucket, "dry run: would enforce block public access")
            }
            (ActionStatus::Applied, _) => {
                tracing::info!(bucket, "applied: enforced block public access")
            }
            (ActionStatus::Skipped, error) => tracing::warn!(
                bucket,
                error = %error.as_ref().map(ToString::to_string).unwrap_or_default(),
                "skipped"
            ),
            (ActionStatus::Failed, error) => tracing::error!(
                bucket,
                error = %error.as_ref().map(ToString::to_string).unwrap_or_default(),
                "failed"
            ),
            (ActionStatus::Pending, _) => {}
        }
    }
}

/// 1 when changes were applied and at least one failed, 0 otherwise.
pub fn remediation_exit_code(report: &RemediationReport) -> i32 {
    if report.approve_mode && report.summary.failed > 0 {
        1
    } else {
        0
    }
}
