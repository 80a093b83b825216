use anyhow::{Context, Result};
use eventhub::{
    infra::storages::minio::MinioStorageConfig,
    mail::smtp::{SmtpConfig, SmtpTls},
};

use super::{
    config_model::{
        BackendServer, Database, DotEnvyConfig, ObjectStorage, Razorpay,
    },
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    // Sessions read the secret per request; refuse to start without it.
    get_auth_secret()?;

    Ok(DotEnvyConfig {
        backend_server,
        database: load_database()?,
        razorpay: load_razorpay()?,
        object_storage: load_object_storage()?,
        smtp: load_smtp()?,
    })
}

pub fn load_database() -> Result<Database> {
    Ok(Database {
        url: required("DATABASE_URL")?,
    })
}

pub fn load_razorpay() -> Result<Razorpay> {
    Ok(Razorpay {
        key_id: required("RAZORPAY_KEY_ID")?,
        key_secret: required("RAZORPAY_KEY_SECRET")?,
        webhook_secret: required("RAZORPAY_WEBHOOK_SECRET")?,
        currency: optional("PAYMENT_CURRENCY")
            .unwrap_or_else(|| "INR".to_string())
            .to_ascii_uppercase(),
        api_base: optional("RAZORPAY_API_BASE"),
    })
}

pub fn load_object_storage() -> Result<ObjectStorage> {
    Ok(ObjectStorage {
        minio: MinioStorageConfig {
            endpoint: required("MINIO_ENDPOINT")?,
            region: optional("MINIO_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            public_base_url: required("MINIO_PUBLIC_URL")?,
        },
        bucket: required("MINIO_BUCKET")?,
    })
}

pub fn load_smtp() -> Result<SmtpConfig> {
    let port: u16 = required("SMTP_PORT")?
        .parse()
        .context("SMTP_PORT is invalid")?;

    Ok(SmtpConfig {
        host: required("SMTP_HOST")?,
        port,
        username: optional("SMTP_USERNAME"),
        password: optional("SMTP_PASSWORD"),
        from: required("SMTP_FROM")?,
        tls: SmtpTls::for_port(port),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_auth_secret() -> Result<String> {
    required("JWT_SECRET")
}

/// Reads a mandatory variable. Empty values count as missing.
pub fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("{} is missing", key))
}

pub fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
