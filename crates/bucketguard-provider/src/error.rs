use bucketguard_domain::model::ProviderFault;
use serde::{Deserialize, Serialize};

/// Failure of a single provider call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Structured error envelope returned by the storage service.
    #[error("{}", describe(.code, .message))]
    Service {
        code: String,
        message: Option<String>,
    },

    /// Transport failures, malformed responses, local state problems.
    #[error("{0}")]
    Unexpected(String),
}

fn describe(code: &str, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{code}: {message}"),
        None => code.to_string(),
    }
}

impl ProviderError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Service {
            code: code.into(),
            message: Some(message.into()),
        }
    }

    pub fn no_such_bucket(bucket: &str) -> Self {
        ProviderError::service(
            "NoSuchBucket",
            format!("The specified bucket does not exist: {bucket}"),
        )
    }
}

impl From<ProviderError> for ProviderFault {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Service { code, message } => ProviderFault::Service { code, message },
            ProviderError::Unexpected(description) => ProviderFault::Unexpected(description),
        }
    }
}

/// A fault as written in an inventory file or configured on a [`crate::MemoryProvider`].
///
/// `{"code": "...", "message": "..."}` is a service error; a bare string is unexpected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InjectedFault {
    Service {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Unexpected(String),
}

impl InjectedFault {
    pub fn access_denied() -> Self {
        InjectedFault::Service {
            code: "AccessDenied".to_string(),
            message: Some("Access Denied".to_string()),
        }
    }

    pub fn to_error(&self) -> ProviderError {
        match self {
            InjectedFault::Service { code, message } => ProviderError::Service {
                code: code.clone(),
                message: message.clone(),
            },
            InjectedFault::Unexpected(description) => {
                ProviderError::Unexpected(description.clone())
            }
        }
    }
}
