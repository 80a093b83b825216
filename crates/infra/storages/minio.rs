use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{error::SdkError, primitives::ByteStream};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::repositories::storage::ObjectStorage;

use super::s3::{S3Config, build_s3_client, describe_sdk_error};

#[derive(Debug, Clone)]
pub struct MinioStorageConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL objects are served from, e.g. `https://cdn.example.com`.
    pub public_base_url: String,
}

pub struct MinioStorageClient {
    client: aws_sdk_s3::Client,
    public_base_url: String,
    known_buckets: Mutex<HashSet<String>>,
}

impl MinioStorageClient {
    pub async fn new(config: MinioStorageConfig) -> Result<Self> {
        let client = build_s3_client(&S3Config::new(
            config.endpoint,
            config.region,
            config.access_key,
            config.secret_key,
        ))
        .await
        .context("failed to build MinIO s3 client")?;

        Ok(Self {
            client,
            public_base_url: config.public_base_url,
            known_buckets: Mutex::new(HashSet::new()),
        })
    }

    fn is_known(&self, bucket: &str) -> bool {
        self.known_buckets
            .lock()
            .map(|known| known.contains(bucket))
            .unwrap_or(false)
    }

    fn remember(&self, bucket: &str) {
        if let Ok(mut known) = self.known_buckets.lock() {
            known.insert(bucket.to_string());
        }
    }

    async fn create_public_bucket(&self, bucket: &str) -> Result<()> {
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => {}
            Err(SdkError::ServiceError(service_err))
                if service_err.err().is_bucket_already_owned_by_you()
                    || service_err.err().is_bucket_already_exists() => {}
            Err(err) => return Err(describe_sdk_error(err, "create bucket", bucket, "")),
        }

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(public_read_policy(bucket))
            .send()
            .await
            .map_err(|err| describe_sdk_error(err, "set bucket policy", bucket, ""))?;

        info!(%bucket, "storage: bucket created with public read policy");
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MinioStorageClient {
    async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        if self.is_known(bucket) {
            return Ok(());
        }

        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => {}
            Err(SdkError::ServiceError(service_err)) if service_err.err().is_not_found() => {
                self.create_public_bucket(bucket).await?;
            }
            Err(err) => return Err(describe_sdk_error(err, "check bucket", bucket, "")),
        }

        self.remember(bucket);
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size_bytes: u64,
        content_type: &str,
    ) -> Result<String> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("failed to open upload file {}", path.display()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .content_length(i64::try_from(size_bytes).context("upload too large")?)
            .send()
            .await
            .map_err(|err| describe_sdk_error(err, "upload object", bucket, key))?;

        info!(%bucket, %key, size_bytes, "storage: object uploaded");
        Ok(public_url(&self.public_base_url, bucket, key))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| describe_sdk_error(err, "delete object", bucket, key))?;

        Ok(())
    }
}

pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket, key)
}

/// Builds `<prefix>/<uuid>.<ext>`, keeping only a short alphanumeric extension from
/// the client-supplied file name.
pub fn build_object_key(prefix: &str, file_name: Option<&str>) -> String {
    let prefix = prefix.trim_matches('/');
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    let id = Uuid::new_v4();
    match (prefix.is_empty(), extension) {
        (true, Some(ext)) => format!("{}.{}", id, ext),
        (true, None) => id.to_string(),
        (false, Some(ext)) => format!("{}/{}.{}", prefix, id, ext),
        (false, None) => format!("{}/{}", prefix, id),
    }
}

/// Prefers a specific declared type; falls back to guessing from the file name.
pub fn content_type_for(file_name: Option<&str>, declared: Option<&str>) -> String {
    let declared = declared
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "application/octet-stream");
    if let Some(declared) = declared {
        return declared.to_ascii_lowercase();
    }

    file_name
        .map(|name| mime_guess::from_path(name).first_or_octet_stream())
        .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM)
        .essence_str()
        .to_string()
}

fn public_read_policy(bucket: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": ["*"] },
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{}/*", bucket)]
        }]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_base_bucket_and_key() {
        assert_eq!(
            public_url("https://cdn.example.com/", "media", "gallery/a.png"),
            "https://cdn.example.com/media/gallery/a.png"
        );
    }

    #[test]
    fn object_key_keeps_a_safe_extension() {
        let key = build_object_key("/events/", Some("Poster.JPG"));
        assert!(key.starts_with("events/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn object_key_drops_suspicious_extensions() {
        let key = build_object_key("docs", Some("report.p$f"));
        assert!(key.starts_with("docs/"));
        assert!(!key.contains('.'));

        let key = build_object_key("docs", None);
        assert_eq!(key.len(), "docs/".len() + 36);
    }

    #[test]
    fn content_type_falls_back_to_file_name() {
        assert_eq!(content_type_for(Some("deck.pdf"), None), "application/pdf");
        assert_eq!(
            content_type_for(Some("photo.png"), Some("application/octet-stream")),
            "image/png"
        );
        assert_eq!(content_type_for(Some("photo.png"), Some("Image/JPEG")), "image/jpeg");
        assert_eq!(content_type_for(None, None), "application/octet-stream");
    }

    #[test]
    fn policy_grants_read_on_bucket_objects() {
        let policy: serde_json::Value = serde_json::from_str(&public_read_policy("media")).unwrap();
        assert_eq!(
            policy["Statement"][0]["Resource"][0],
            "arn:aws:s3:::media/*"
        );
    }

    // Manual check against a local MinIO:
    // MINIO_ENDPOINT=http://localhost:9000 MINIO_ACCESS_KEY=... MINIO_SECRET_KEY=... \
    // cargo test -p eventhub minio::tests::uploads_to_local_minio -- --ignored --nocapture
    #[tokio::test]
    #[ignore = "hits a real MinIO server and needs credentials"]
    async fn uploads_to_local_minio() -> Result<()> {
        dotenvy::dotenv().ok();

        let client = MinioStorageClient::new(MinioStorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT").context("MINIO_ENDPOINT is required")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY").context("MINIO_ACCESS_KEY is required")?,
            secret_key: std::env::var("MINIO_SECRET_KEY").context("MINIO_SECRET_KEY is required")?,
            public_base_url: std::env::var("MINIO_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
        })
        .await?;

        let path = std::env::temp_dir().join(format!("{}.txt", Uuid::new_v4()));
        tokio::fs::write(&path, b"hello").await?;

        client.ensure_bucket("eventhub-test").await?;
        let url = client
            .put_object("eventhub-test", "manual/hello.txt", &path, 5, "text/plain")
            .await?;
        println!("uploaded to {}", url);

        tokio::fs::remove_file(&path).await?;
        Ok(())
    }
}
