use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use eventhub::{
    domain::{repositories::storage::ObjectStorage, value_objects::storage::StoredObject},
    infra::storages::minio::build_object_key,
};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{info, warn};
use uuid::Uuid;

/// A client upload staged on local disk. The file is removed when this value is dropped,
/// whether or not it made it to the bucket.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    file_name: Option<String>,
    content_type: String,
    size_bytes: u64,
}

impl TempUpload {
    pub fn new_path() -> PathBuf {
        std::env::temp_dir().join(format!("eventhub-upload-{}", Uuid::new_v4()))
    }

    /// Stages `bytes` in a fresh temp file.
    pub async fn from_bytes(
        bytes: &[u8],
        file_name: Option<String>,
        content_type: String,
    ) -> Result<Self> {
        let mut writer = TempUploadWriter::create(file_name, content_type).await?;
        writer.write(bytes).await?;
        writer.finish().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "uploads: failed to remove temp file"
            ),
        }
    }
}

/// Streams chunks into a temp file. Owns a [`TempUpload`] from the first byte, so an
/// aborted upload still cleans up after itself.
pub struct TempUploadWriter {
    file: File,
    upload: TempUpload,
}

impl TempUploadWriter {
    pub async fn create(file_name: Option<String>, content_type: String) -> Result<Self> {
        let path = TempUpload::new_path();
        let upload = TempUpload {
            path,
            file_name,
            content_type,
            size_bytes: 0,
        };
        let file = File::create(&upload.path)
            .await
            .with_context(|| format!("failed to create temp file {}", upload.path.display()))?;

        Ok(Self { file, upload })
    }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.file
            .write_all(chunk)
            .await
            .context("failed to write upload chunk")?;
        self.upload.size_bytes += chunk.len() as u64;
        Ok(())
    }

    pub fn size_bytes(&self) -> u64 {
        self.upload.size_bytes
    }

    pub async fn finish(mut self) -> Result<TempUpload> {
        self.file.flush().await.context("failed to flush upload")?;
        Ok(self.upload)
    }
}

/// Puts staged uploads into the media bucket.
pub struct MediaStore {
    storage: Arc<dyn ObjectStorage + Send + Sync>,
    bucket: String,
}

impl MediaStore {
    pub fn new(storage: Arc<dyn ObjectStorage + Send + Sync>, bucket: String) -> Self {
        Self { storage, bucket }
    }

    pub async fn store(&self, prefix: &str, upload: &TempUpload) -> Result<StoredObject> {
        self.storage.ensure_bucket(&self.bucket).await?;

        let key = build_object_key(prefix, upload.file_name());
        let url = self
            .storage
            .put_object(
                &self.bucket,
                &key,
                upload.path(),
                upload.size_bytes(),
                upload.content_type(),
            )
            .await?;

        info!(bucket = %self.bucket, %key, size_bytes = upload.size_bytes(), "uploads: stored");

        Ok(StoredObject {
            bucket: self.bucket.clone(),
            key,
            url,
            content_type: upload.content_type().to_string(),
            size_bytes: upload.size_bytes(),
        })
    }

    /// Deletes an object that is no longer referenced. Failures only log; a stray object
    /// costs storage, not correctness.
    pub async fn discard(&self, key: &str) {
        if let Err(err) = self.storage.delete_object(&self.bucket, key).await {
            warn!(bucket = %self.bucket, %key, error = ?err, "uploads: failed to delete object");
        }
    }
}
