//! Property-based tests for the domain crate.
//!
//! Covers summary arithmetic, threshold monotonicity and the remediation
//! contract (dry runs never write, every target is processed).

use crate::engine::threshold_breached;
use crate::model::ProviderFault;
use crate::remediation::remediate;
use crate::report::{build_remediation_report, summarize_findings};
use bucketguard_types::{ActionStatus, Finding, Severity};
use proptest::prelude::*;
use time::OffsetDateTime;

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::None),
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

fn arb_bucket() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => prop::string::string_regex("[a-z][a-z0-9-]{2,20}")
            .expect("valid regex")
            .prop_map(Some),
        1 => Just(None),
        1 => Just(Some("   ".to_string())),
    ]
}

fn arb_finding() -> impl Strategy<Value = Finding> {
    (arb_bucket(), arb_severity()).prop_map(|(bucket, severity)| Finding {
        bucket,
        issue: "issue".to_string(),
        severity,
        check_id: None,
        code: None,
        details: None,
    })
}

proptest! {
    #[test]
    fn severity_counts_sum_to_total(findings in prop::collection::vec(arb_finding(), 0..40)) {
        let s = summarize_findings(&findings);
        prop_assert_eq!(s.total_findings as usize, findings.len());
        prop_assert_eq!(s.critical + s.high + s.medium + s.low + s.none, s.total_findings);
        for sev in Severity::ALL {
            let expected = findings.iter().filter(|f| f.severity == sev).count() as u32;
            prop_assert_eq!(s.count(sev), expected);
        }
    }

    #[test]
    fn threshold_is_monotonic(
        findings in prop::collection::vec(arb_finding(), 0..20),
        fail_on in arb_severity(),
    ) {
        let breached = threshold_breached(&findings, fail_on);
        if fail_on == Severity::None {
            prop_assert!(!breached);
        } else {
            prop_assert_eq!(breached, findings.iter().any(|f| f.severity >= fail_on));
        }
    }

    #[test]
    fn dry_run_performs_no_writes(findings in prop::collection::vec(arb_finding(), 0..30)) {
        let mut writes = 0usize;
        let actions = remediate(&findings, false, |_, _| {
            writes += 1;
            Ok(())
        });
        prop_assert_eq!(writes, 0);
        prop_assert!(actions
            .iter()
            .all(|a| matches!(a.status, ActionStatus::DryRun | ActionStatus::Skipped)));
    }

    #[test]
    fn every_target_gets_a_terminal_action(
        findings in prop::collection::vec(arb_finding(), 0..30),
        fail_mask in prop::collection::vec(any::<bool>(), 30),
    ) {
        let mut calls = 0usize;
        let actions = remediate(&findings, true, |_, _| {
            let fail = fail_mask[calls % fail_mask.len()];
            calls += 1;
            if fail {
                Err(ProviderFault::Service { code: "AccessDenied".to_string(), message: None })
            } else {
                Ok(())
            }
        });

        let targets = findings.iter().filter(|f| f.severity == Severity::Critical).count();
        prop_assert_eq!(actions.len(), targets);
        prop_assert!(actions.iter().all(|a| a.status.is_terminal()));
        prop_assert!(actions.iter().all(|a| a.status != ActionStatus::DryRun));

        let report = build_remediation_report(OffsetDateTime::UNIX_EPOCH, true, actions);
        prop_assert_eq!(report.summary.total(), report.targets);
        prop_assert_eq!((report.summary.applied + report.summary.failed) as usize, calls);
    }
}
