use crate::{InjectedFault, ProviderError, StorageProvider};
use bucketguard_types::{EncryptionConfig, PublicAccessBlock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// State of one bucket, plus faults to inject on its calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub name: String,

    /// `None` means no public access block is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access_block: Option<PublicAccessBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionConfig>,

    /// Returned by `get_public_access_block`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_error: Option<InjectedFault>,
    /// Returned by `put_public_access_block`; the stored block is left unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_error: Option<InjectedFault>,
    /// Returned by `get_bucket_encryption`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_error: Option<InjectedFault>,
}

impl BucketRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_public_access_block(mut self, config: PublicAccessBlock) -> Self {
        self.public_access_block = Some(config);
        self
    }

    pub fn with_encryption(mut self, algorithm: impl Into<String>) -> Self {
        self.encryption = Some(EncryptionConfig {
            algorithm: Some(algorithm.into()),
        });
        self
    }

    pub fn with_read_error(mut self, fault: InjectedFault) -> Self {
        self.read_error = Some(fault);
        self
    }

    pub fn with_write_error(mut self, fault: InjectedFault) -> Self {
        self.write_error = Some(fault);
        self
    }

    pub fn with_encryption_error(mut self, fault: InjectedFault) -> Self {
        self.encryption_error = Some(fault);
        self
    }
}

/// In-process provider. Listing order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    buckets: Mutex<Vec<BucketRecord>>,
    list_error: Option<InjectedFault>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryProvider {
    pub fn new(buckets: Vec<BucketRecord>) -> Self {
        Self {
            buckets: Mutex::new(buckets),
            ..Self::default()
        }
    }

    /// Make `list_buckets` fail with `fault`.
    pub fn with_list_error(mut self, fault: InjectedFault) -> Self {
        self.list_error = Some(fault);
        self
    }

    pub fn list_error(&self) -> Option<&InjectedFault> {
        self.list_error.as_ref()
    }

    /// Configuration reads issued so far (both kinds, failures included).
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Write calls issued so far, failures included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the current bucket state.
    pub fn snapshot(&self) -> Result<Vec<BucketRecord>, ProviderError> {
        Ok(self.lock()?.clone())
    }

    /// Replace the whole bucket state, e.g. with an earlier `snapshot`.
    pub fn restore(&self, buckets: Vec<BucketRecord>) -> Result<(), ProviderError> {
        *self.lock()? = buckets;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<BucketRecord>>, ProviderError> {
        self.buckets
            .lock()
            .map_err(|_| ProviderError::Unexpected("bucket state lock poisoned".to_string()))
    }

    fn with_bucket<T>(
        &self,
        bucket: &str,
        f: impl FnOnce(&mut BucketRecord) -> Result<T, ProviderError>,
    ) -> Result<T, ProviderError> {
        let mut buckets = self.lock()?;
        let record = buckets
            .iter_mut()
            .find(|b| b.name == bucket)
            .ok_or_else(|| ProviderError::no_such_bucket(bucket))?;
        f(record)
    }
}

impl StorageProvider for MemoryProvider {
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError> {
        if let Some(fault) = &self.list_error {
            return Err(fault.to_error());
        }
        Ok(self.lock()?.iter().map(|b| b.name.clone()).collect())
    }

    fn get_public_access_block(
        &self,
        bucket: &str,
    ) -> Result<Option<PublicAccessBlock>, ProviderError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.with_bucket(bucket, |record| match &record.read_error {
            Some(fault) => Err(fault.to_error()),
            None => Ok(record.public_access_block.clone()),
        })
    }

    fn put_public_access_block(
        &self,
        bucket: &str,
        config: &PublicAccessBlock,
    ) -> Result<(), ProviderError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.with_bucket(bucket, |record| match &record.write_error {
            Some(fault) => Err(fault.to_error()),
            None => {
                record.public_access_block = Some(config.clone());
                Ok(())
            }
        })
    }

    fn get_bucket_encryption(
        &self,
        bucket: &str,
    ) -> Result<Option<EncryptionConfig>, ProviderError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.with_bucket(bucket, |record| match &record.encryption_error {
            Some(fault) => Err(fault.to_error()),
            None => Ok(record.encryption.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemoryProvider {
        MemoryProvider::new(vec![
            BucketRecord::new("open"),
            BucketRecord::new("safe").with_public_access_block(PublicAccessBlock::enforced()),
            BucketRecord::new("locked").with_read_error(InjectedFault::access_denied()),
        ])
    }

    #[test]
    fn lists_in_insertion_order() {
        assert_eq!(
            provider().list_buckets().expect("list"),
            vec!["open", "safe", "locked"]
        );
    }

    #[test]
    fn absent_block_is_none_not_error() {
        let p = provider();
        assert_eq!(p.get_public_access_block("open").expect("read"), None);
        assert_eq!(
            p.get_public_access_block("safe").expect("read"),
            Some(PublicAccessBlock::enforced())
        );
        assert_eq!(p.reads(), 2);
    }

    #[test]
    fn injected_read_fault_is_returned() {
        let err = provider()
            .get_public_access_block("locked")
            .expect_err("read should fail");
        assert_eq!(err, ProviderError::service("AccessDenied", "Access Denied"));
    }

    #[test]
    fn unknown_bucket_is_no_such_bucket() {
        let err = provider()
            .get_bucket_encryption("ghost")
            .expect_err("unknown bucket");
        assert!(matches!(err, ProviderError::Service { ref code, .. } if code == "NoSuchBucket"));
    }

    #[test]
    fn write_overwrites_and_is_counted() {
        let p = provider();
        p.put_public_access_block("open", &PublicAccessBlock::enforced())
            .expect("write");
        p.put_public_access_block("open", &PublicAccessBlock::enforced())
            .expect("rewrite");
        assert_eq!(p.writes(), 2);
        assert_eq!(
            p.get_public_access_block("open").expect("read"),
            Some(PublicAccessBlock::enforced())
        );
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        let p = MemoryProvider::new(vec![
            BucketRecord::new("ro").with_write_error(InjectedFault::access_denied()),
        ]);
        assert!(
            p.put_public_access_block("ro", &PublicAccessBlock::enforced())
                .is_err()
        );
        assert_eq!(p.writes(), 1);
        assert_eq!(p.snapshot().expect("snapshot")[0].public_access_block, None);
    }

    #[test]
    fn list_fault_fails_listing() {
        let p = provider().with_list_error(InjectedFault::Unexpected("no credentials".to_string()));
        assert_eq!(
            p.list_buckets(),
            Err(ProviderError::Unexpected("no credentials".to_string()))
        );
    }
}
