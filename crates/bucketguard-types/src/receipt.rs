use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Tool tag written into every report.
pub const TOOL_NAME: &str = "bucketguard";
/// Service tag written into every report.
pub const SERVICE_S3: &str = "s3";

/// Finding severity. Declaration order is the total order used for thresholds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::None,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Numeric rank (`NONE` = 0 .. `CRITICAL` = 4).
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSeverityError(String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown severity: {} (expected NONE|LOW|MEDIUM|HIGH|CRITICAL)",
            self.0
        )
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    /// Bucket the finding is about. Optional on input: a finding without a bucket cannot be
    /// remediated and is skipped.
    #[serde(default, alias = "resource")]
    pub bucket: Option<String>,
    #[serde(default)]
    pub issue: String,
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Raw diagnostic payload (provider error envelope, unprotected flags, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl Finding {
    /// The bucket name, if present and non-blank.
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanSummary {
    pub total_findings: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    #[serde(default)]
    pub none: u32,
}

impl ScanSummary {
    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::None => self.none,
        }
    }
}

/// The persisted output of a scan and the sole input to remediation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub service: String,
    pub scanner: String,
    #[serde(alias = "scanned_buckets")]
    pub scanned_count: u32,
    pub findings: Vec<Finding>,
    pub summary: ScanSummary,
}

/// Lenient view of a findings file used at remediation start.
///
/// Only the findings matter to remediation; everything else in the document is ignored so
/// hand-reviewed or older reports remain usable. Entries whose severity is missing or not
/// one of the five levels can never be targets and are dropped.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FindingsDocument {
    #[serde(default, deserialize_with = "ranked_findings")]
    pub findings: Vec<Finding>,
}

fn ranked_findings<'de, D>(deserializer: D) -> Result<Vec<Finding>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let entries = Vec::<JsonValue>::deserialize(deserializer)?;
    let mut findings = Vec::with_capacity(entries.len());
    for entry in entries {
        let ranked = entry
            .get("severity")
            .and_then(JsonValue::as_str)
            .is_some_and(|s| Severity::ALL.iter().any(|sev| sev.as_str() == s));
        if !entry.is_object() || ranked {
            findings.push(Finding::deserialize(entry).map_err(D::Error::custom)?);
        }
    }
    Ok(findings)
}
