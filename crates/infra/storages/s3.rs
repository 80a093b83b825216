use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, timeout::TimeoutConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    Client,
    config::{Region, StalledStreamProtectionConfig},
    error::{ProvideErrorMetadata, SdkError},
};
use http::Uri;

/// Connection settings for any S3 speaking store. MinIO wants path-style addressing.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub force_path_style: bool,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl S3Config {
    pub fn new(endpoint: String, region: String, access_key: String, secret_key: String) -> Self {
        Self {
            endpoint,
            region,
            access_key,
            secret_key,
            force_path_style: true,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
        }
    }

    fn endpoint_url(&self) -> Result<String> {
        let endpoint = format!("{}/", self.endpoint.trim().trim_end_matches('/'));
        let uri = Uri::from_str(&endpoint)
            .with_context(|| format!("invalid object storage endpoint: {}", self.endpoint))?;
        anyhow::ensure!(
            uri.scheme().is_some() && uri.host().is_some(),
            "object storage endpoint needs a scheme and host: {}",
            self.endpoint
        );
        Ok(endpoint)
    }
}

pub async fn build_s3_client(config: &S3Config) -> Result<Client> {
    let endpoint = config.endpoint_url()?;

    let credentials = Credentials::new(
        config.access_key.clone(),
        config.secret_key.clone(),
        None,
        None,
        "eventhub-object-storage",
    );

    let region = Region::new(config.region.clone());
    let shared_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region.clone())
        .credentials_provider(credentials)
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(config.connect_timeout)
                .read_timeout(config.read_timeout)
                .build(),
        )
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
        .endpoint_url(endpoint)
        .force_path_style(config.force_path_style)
        .region(region)
        .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
        .build();

    Ok(Client::from_conf(s3_config))
}

/// Turns an SDK failure into an error that names the operation, bucket and key, and
/// includes the service status and code when the store answered.
pub fn describe_sdk_error<E>(err: SdkError<E>, operation: &str, bucket: &str, key: &str) -> anyhow::Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if let SdkError::ServiceError(service_err) = &err {
        let status = service_err.raw().status().as_u16();
        let code = service_err.err().code().unwrap_or("unknown");
        let message = service_err.err().message().unwrap_or_default();

        let mut detail = format!(
            "failed to {} (status {}, code {})",
            operation, status, code
        );
        if !message.is_empty() {
            detail.push_str(&format!(": {}", message));
        }
        detail.push_str(&format!(" [bucket={}, key={}]", bucket, key));

        return anyhow::anyhow!(detail);
    }

    anyhow::Error::new(err).context(format!(
        "failed to {} [bucket={}, key={}]",
        operation, bucket, key
    ))
}
