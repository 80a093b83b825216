use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::media_assets::{InsertMediaAssetEntity, MediaAssetEntity},
    value_objects::enums::media_kinds::MediaKind,
};

#[automock]
#[async_trait]
pub trait MediaAssetRepository {
    async fn list(&self, kind: MediaKind) -> Result<Vec<MediaAssetEntity>>;

    async fn insert(&self, asset: InsertMediaAssetEntity) -> Result<MediaAssetEntity>;

    async fn delete(&self, kind: MediaKind, asset_id: i64) -> Result<Option<MediaAssetEntity>>;
}
