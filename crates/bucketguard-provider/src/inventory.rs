//! JSON inventory snapshot served as a storage provider.
//!
//! ```json
//! {
//!   "buckets": [
//!     { "name": "logs" },
//!     { "name": "site", "public_access_block": { "BlockPublicAcls": true } },
//!     { "name": "vault", "read_error": { "code": "AccessDenied", "message": "Access Denied" } }
//!   ]
//! }
//! ```

use crate::{BucketRecord, InjectedFault, MemoryProvider, ProviderError, StorageProvider};
use anyhow::Context;
use bucketguard_types::{EncryptionConfig, PublicAccessBlock};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFile {
    /// Makes listing fail, e.g. to simulate missing credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_error: Option<InjectedFault>,
    #[serde(default)]
    pub buckets: Vec<BucketRecord>,
}

pub fn parse_inventory(text: &str) -> anyhow::Result<InventoryFile> {
    serde_json::from_str(text).context("parse inventory json")
}

/// Reads come from the loaded snapshot; every successful write is persisted to `path`.
#[derive(Debug)]
pub struct InventoryProvider {
    path: Utf8PathBuf,
    inner: MemoryProvider,
    persist: Mutex<()>,
}

impl InventoryProvider {
    pub fn open(path: &Utf8Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("read inventory {path}"))?;
        let file = parse_inventory(&text).with_context(|| format!("load inventory {path}"))?;
        tracing::debug!(%path, buckets = file.buckets.len(), "inventory loaded");
        Ok(Self::from_inventory(path, file))
    }

    pub fn from_inventory(path: &Utf8Path, file: InventoryFile) -> Self {
        let mut inner = MemoryProvider::new(file.buckets);
        if let Some(fault) = file.list_error {
            inner = inner.with_list_error(fault);
        }
        Self {
            path: path.to_path_buf(),
            inner,
            persist: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn reads(&self) -> usize {
        self.inner.reads()
    }

    pub fn writes(&self) -> usize {
        self.inner.writes()
    }

    fn persist(&self) -> Result<(), ProviderError> {
        let file = InventoryFile {
            list_error: self.inner.list_error().cloned(),
            buckets: self.inner.snapshot()?,
        };
        write_inventory(&self.path, &file)
            .map_err(|err| ProviderError::Unexpected(format!("{err:#}")))?;
        tracing::debug!(path = %self.path, "inventory persisted");
        Ok(())
    }
}

fn write_inventory(path: &Utf8Path, file: &InventoryFile) -> anyhow::Result<()> {
    let mut bytes = serde_json::to_vec_pretty(file).context("serialize inventory")?;
    bytes.push(b'\n');
    std::fs::write(path, bytes).with_context(|| format!("write inventory {path}"))
}

impl StorageProvider for InventoryProvider {
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError> {
        self.inner.list_buckets()
    }

    fn get_public_access_block(
        &self,
        bucket: &str,
    ) -> Result<Option<PublicAccessBlock>, ProviderError> {
        self.inner.get_public_access_block(bucket)
    }

    fn put_public_access_block(
        &self,
        bucket: &str,
        config: &PublicAccessBlock,
    ) -> Result<(), ProviderError> {
        let _guard = self
            .persist
            .lock()
            .map_err(|_| ProviderError::Unexpected("inventory lock poisoned".to_string()))?;
        let before = self.inner.snapshot()?;
        self.inner.put_public_access_block(bucket, config)?;
        // A write that cannot be saved is undone in memory too.
        if let Err(err) = self.persist() {
            self.inner.restore(before)?;
            return Err(err);
        }
        Ok(())
    }

    fn get_bucket_encryption(
        &self,
        bucket: &str,
    ) -> Result<Option<EncryptionConfig>, ProviderError> {
        self.inner.get_bucket_encryption(bucket)
    }
}
