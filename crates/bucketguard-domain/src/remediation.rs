//! Remediation planning and the action state machine.
//!
//! ```text
//! DRY_RUN ──approve──> PENDING ──write ok──> APPLIED
//!                         └─────write err──> FAILED
//! (no bucket) ─────────────────────────────> SKIPPED
//! ```
//!
//! The provider write is injected as a closure so this module stays free of IO.

use crate::model::ProviderFault;
use bucketguard_types::{
    Action, ActionError, ActionKind, ActionStatus, Finding, PublicAccessBlock, Severity,
};

pub const MISSING_BUCKET_ERROR: &str = "Missing bucket name in finding.";

/// Only the top severity tier is acted on; everything below is advisory.
pub fn is_target(finding: &Finding) -> bool {
    finding.severity == Severity::Critical
}

pub fn select_targets(findings: &[Finding]) -> Vec<&Finding> {
    findings.iter().filter(|f| is_target(f)).collect()
}

/// Initial action for a target: `DRY_RUN`, or `SKIPPED` when the bucket is unresolvable.
pub fn plan(finding: &Finding) -> Action {
    let mut action = Action {
        bucket: finding.bucket.clone(),
        issue: finding.issue.clone(),
        action_kind: ActionKind::PutPublicAccessBlock,
        requested_config: PublicAccessBlock::enforced(),
        status: ActionStatus::DryRun,
        error: None,
    };
    if finding.bucket_name().is_none() {
        action.status = ActionStatus::Skipped;
        action.error = Some(ActionError::Message(MISSING_BUCKET_ERROR.to_string()));
    }
    action
}

/// `DRY_RUN -> PENDING`. Any other state is left untouched and `false` is returned.
pub fn begin_apply(action: &mut Action) -> bool {
    if action.status != ActionStatus::DryRun {
        return false;
    }
    action.status = ActionStatus::Pending;
    true
}

/// `PENDING -> APPLIED | FAILED`. Ignored for actions that are not pending.
pub fn finish_apply(action: &mut Action, outcome: Result<(), ProviderFault>) {
    if action.status != ActionStatus::Pending {
        return;
    }
    match outcome {
        Ok(()) => {
            action.status = ActionStatus::Applied;
            action.error = None;
        }
        Err(ProviderFault::Service { code, message }) => {
            action.status = ActionStatus::Failed;
            action.error = Some(ActionError::Provider { code, message });
        }
        Err(ProviderFault::Unexpected(description)) => {
            action.status = ActionStatus::Failed;
            action.error = Some(ActionError::Message(description));
        }
    }
}

/// Build one action per CRITICAL finding, in report order.
///
/// With `approve == false` the `write` closure is never called. A failed write only
/// affects its own action; every target is always processed.
pub fn remediate<W>(findings: &[Finding], approve: bool, mut write: W) -> Vec<Action>
where
    W: FnMut(&str, &PublicAccessBlock) -> Result<(), ProviderFault>,
{
    select_targets(findings)
        .into_iter()
        .map(|finding| {
            let mut action = plan(finding);
            if let Some(bucket) = finding.bucket_name()
                && approve
                && begin_apply(&mut action)
            {
                let outcome = write(bucket, &action.requested_config);
                finish_apply(&mut action, outcome);
            }
            action
        })
        .collect()
}
