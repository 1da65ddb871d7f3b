use bucketguard_types::{EncryptionConfig, PublicAccessBlock};
use serde_json::{json, Value as JsonValue};
use std::fmt;

/// Why a provider call did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderFault {
    /// Structured error envelope from the provider.
    Service {
        code: String,
        message: Option<String>,
    },
    /// Anything else: transport failures, malformed responses, ...
    Unexpected(String),
}

impl ProviderFault {
    /// Diagnostic payload recorded on findings.
    pub fn details(&self) -> JsonValue {
        match self {
            ProviderFault::Service { code, message } => json!({
                "code": code,
                "message": message,
            }),
            ProviderFault::Unexpected(description) => JsonValue::String(description.clone()),
        }
    }
}

impl fmt::Display for ProviderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFault::Service {
                code,
                message: Some(message),
            } => write!(f, "{code}: {message}"),
            ProviderFault::Service {
                code,
                message: None,
            } => f.write_str(code),
            ProviderFault::Unexpected(description) => f.write_str(description),
        }
    }
}

/// Outcome of reading one piece of bucket configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observed<T> {
    Present(T),
    /// The provider reported that no such configuration exists.
    Absent,
    Failed(ProviderFault),
}

impl<T> From<Result<Option<T>, ProviderFault>> for Observed<T> {
    fn from(result: Result<Option<T>, ProviderFault>) -> Self {
        match result {
            Ok(Some(value)) => Observed::Present(value),
            Ok(None) => Observed::Absent,
            Err(fault) => Observed::Failed(fault),
        }
    }
}

/// Everything collected about one bucket. `None` means the read was not attempted
/// because no enabled check needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketModel {
    pub name: String,
    pub public_access_block: Option<Observed<PublicAccessBlock>>,
    pub encryption: Option<Observed<EncryptionConfig>>,
}

impl BucketModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_access_block: None,
            encryption: None,
        }
    }
}

/// The in-scope buckets of one scan, in listing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventoryModel {
    pub buckets: Vec<BucketModel>,
}
