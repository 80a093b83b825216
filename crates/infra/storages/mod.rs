pub mod minio;
pub mod s3;
