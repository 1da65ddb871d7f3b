use crate::model::ProviderFault;
use bucketguard_types::{ids, Finding, Severity};

/// A configuration read failed. Recorded as HIGH so the bucket is neither silently dropped
/// nor escalated to a remediation target.
pub fn scan_error_finding(bucket: &str, check_id: &str, subject: &str, fault: &ProviderFault) -> Finding {
    let issue = match fault {
        ProviderFault::Service { code, .. } => {
            format!("Could not {subject} (provider error: {code})")
        }
        ProviderFault::Unexpected(_) => format!("Could not {subject} (unexpected error)"),
    };
    Finding {
        bucket: Some(bucket.to_string()),
        issue,
        severity: Severity::High,
        check_id: Some(check_id.to_string()),
        code: Some(ids::CODE_SCAN_ERROR.to_string()),
        details: Some(fault.details()),
    }
}
