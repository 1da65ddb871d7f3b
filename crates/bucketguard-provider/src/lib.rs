//! Storage provider adapters.
//!
//! This crate is allowed to do filesystem IO. Everything above it talks to storage through the
//! [`StorageProvider`] trait and never sees a concrete client.

#![forbid(unsafe_code)]

mod error;
mod inventory;
mod memory;

use bucketguard_types::{EncryptionConfig, PublicAccessBlock};

pub use error::{InjectedFault, ProviderError};
pub use inventory::{parse_inventory, InventoryFile, InventoryProvider};
pub use memory::{BucketRecord, MemoryProvider};

/// Bucket listing plus configuration reads and writes.
///
/// Reads return `Ok(None)` when the provider reports that no such configuration exists.
pub trait StorageProvider: Send + Sync {
    fn list_buckets(&self) -> Result<Vec<String>, ProviderError>;

    fn get_public_access_block(
        &self,
        bucket: &str,
    ) -> Result<Option<PublicAccessBlock>, ProviderError>;

    /// Full overwrite of the bucket's public access block.
    fn put_public_access_block(
        &self,
        bucket: &str,
        config: &PublicAccessBlock,
    ) -> Result<(), ProviderError>;

    fn get_bucket_encryption(&self, bucket: &str)
    -> Result<Option<EncryptionConfig>, ProviderError>;
}
