use crate::PublicAccessBlock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Lifecycle of a remediation action.
///
/// `DRY_RUN` is the initial state. `PENDING` only exists between the start of a provider
/// write and its outcome; persisted actions always carry one of the other four values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    DryRun,
    Pending,
    Applied,
    Failed,
    Skipped,
}

impl ActionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::DryRun => "DRY_RUN",
            ActionStatus::Pending => "PENDING",
            ActionStatus::Applied => "APPLIED",
            ActionStatus::Failed => "FAILED",
            ActionStatus::Skipped => "SKIPPED",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ActionStatus::Pending)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corrective operation an action performs. Only one kind is modelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PutPublicAccessBlock,
}

/// Recorded failure of an action.
///
/// Structured provider errors keep their envelope; anything else is a plain description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ActionError {
    Provider {
        code: String,
        message: Option<String>,
    },
    Message(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Provider {
                code,
                message: Some(message),
            } => write!(f, "{code}: {message}"),
            ActionError::Provider {
                code,
                message: None,
            } => f.write_str(code),
            ActionError::Message(message) => f.write_str(message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Action {
    pub bucket: Option<String>,
    pub issue: String,
    #[serde(rename = "action")]
    pub action_kind: ActionKind,
    pub requested_config: PublicAccessBlock,
    pub status: ActionStatus,
    pub error: Option<ActionError>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RemediationSummary {
    pub applied: u32,
    pub failed: u32,
    pub dry_run: u32,
    pub skipped: u32,
}

impl RemediationSummary {
    pub fn total(&self) -> u32 {
        self.applied + self.failed + self.dry_run + self.skipped
    }
}

/// The persisted ledger of one remediation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RemediationReport {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub service: String,
    pub remediator: String,
    pub approve_mode: bool,
    pub targets: u32,
    pub actions: Vec<Action>,
    pub summary: RemediationSummary,
}
