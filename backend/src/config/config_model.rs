use eventhub::{infra::storages::minio::MinioStorageConfig, mail::smtp::SmtpConfig};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub razorpay: Razorpay,
    pub object_storage: ObjectStorage,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Razorpay {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub currency: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObjectStorage {
    pub minio: MinioStorageConfig,
    pub bucket: String,
}
