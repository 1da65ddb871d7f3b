//! The `scan` use case: list buckets, read their configuration, evaluate policy.

use anyhow::Context;
use bucketguard_domain::model::{BucketModel, InventoryModel, ProviderFault};
use bucketguard_domain::policy::EffectiveConfig;
use bucketguard_domain::report::build_scan_report;
use bucketguard_provider::StorageProvider;
use bucketguard_types::{ids, Finding, ScanReport};
use rayon::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub report: ScanReport,
    /// At least one finding reached the `fail_on` threshold.
    pub breached: bool,
}

/// Run the scan use case. Only a listing failure is fatal; per-bucket read failures become
/// findings.
pub fn run_scan(
    provider: &dyn StorageProvider,
    cfg: &EffectiveConfig,
) -> anyhow::Result<ScanOutput> {
    let model = collect_inventory(provider, cfg)?;
    let domain = bucketguard_domain::evaluate(&model, cfg);
    log_outcomes(&model, &domain.findings);

    let report = build_scan_report(
        OffsetDateTime::now_utc(),
        domain.scanned_count,
        domain.findings,
    );
    Ok(ScanOutput {
        report,
        breached: domain.breached,
    })
}

/// List buckets once, then read every in-scope bucket in parallel. Listing order is kept.
pub fn collect_inventory(
    provider: &dyn StorageProvider,
    cfg: &EffectiveConfig,
) -> anyhow::Result<InventoryModel> {
    let names = provider.list_buckets().context("list buckets")?;
    tracing::info!(count = names.len(), "found buckets (before filtering)");

    let in_scope: Vec<String> = names.into_iter().filter(|n| cfg.in_scope(n)).collect();
    let buckets = in_scope
        .par_iter()
        .map(|name| read_bucket(provider, name, cfg))
        .collect();

    Ok(InventoryModel { buckets })
}

fn read_bucket(provider: &dyn StorageProvider, name: &str, cfg: &EffectiveConfig) -> BucketModel {
    let mut bucket = BucketModel::new(name);

    if cfg.check_enabled(ids::CHECK_S3_PUBLIC_ACCESS_BLOCK) {
        let result = provider.get_public_access_block(name);
        if let Err(err) = &result {
            tracing::error!(bucket = name, error = %err, "public access block read failed");
        }
        bucket.public_access_block = Some(result.map_err(ProviderFault::from).into());
    }

    if cfg.check_enabled(ids::CHECK_S3_DEFAULT_ENCRYPTION) {
        let result = provider.get_bucket_encryption(name);
        if let Err(err) = &result {
            tracing::error!(bucket = name, error = %err, "default encryption read failed");
        }
        bucket.encryption = Some(result.map_err(ProviderFault::from).into());
    }

    bucket
}

fn log_outcomes(model: &InventoryModel, findings: &[Finding]) {
    for bucket in &model.buckets {
        let mut clean = true;
        for f in findings
            .iter()
            .filter(|f| f.bucket.as_deref() == Some(bucket.name.as_str()))
        {
            clean = false;
            if f.code.as_deref() != Some(ids::CODE_SCAN_ERROR) {
                tracing::warn!(bucket = %bucket.name, severity = %f.severity, "{}", f.issue);
            }
        }
        if clean {
            tracing::info!(bucket = %bucket.name, "compliant");
        }
    }
}

/// 2 when the threshold was reached, 0 otherwise.
pub fn scan_exit_code(breached: bool) -> i32 {
    if breached { 2 } else { 0 }
}
