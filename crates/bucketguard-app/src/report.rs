use anyhow::Context;
use bucketguard_types::{RemediationReport, ScanReport};
use camino::Utf8Path;
use serde::Serialize;

/// Either persisted report kind.
#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum ReportVariant {
    Scan(ScanReport),
    Remediation(RemediationReport),
}

/// Parse a report file, detecting its kind from its keys.
pub fn parse_report_json(text: &str) -> anyhow::Result<ReportVariant> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    if value.get("actions").is_some() {
        let report: RemediationReport =
            serde_json::from_value(value).context("parse remediation report")?;
        Ok(ReportVariant::Remediation(report))
    } else if value.get("findings").is_some() {
        let report: ScanReport = serde_json::from_value(value).context("parse scan report")?;
        Ok(ReportVariant::Scan(report))
    } else {
        anyhow::bail!("unrecognized report: expected a `findings` or `actions` array")
    }
}

/// Pretty JSON with a trailing newline.
pub fn serialize_report<T: Serialize>(report: &T) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn render_markdown(report: &ReportVariant) -> String {
    match report {
        ReportVariant::Scan(r) => bucketguard_render::render_scan_markdown(r),
        ReportVariant::Remediation(r) => bucketguard_render::render_remediation_markdown(r),
    }
}

pub fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {}", path))?;
    Ok(())
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}
