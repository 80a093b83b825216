use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait ObjectStorage {
    /// Creates the bucket when it does not exist yet.
    async fn ensure_bucket(&self, bucket: &str) -> Result<()>;

    /// Streams the file at `path` under `key` and returns its public URL.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size_bytes: u64,
        content_type: &str,
    ) -> Result<String>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
