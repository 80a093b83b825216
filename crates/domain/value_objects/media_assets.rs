use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::domain::{
    entities::media_assets::{InsertMediaAssetEntity, MediaAssetEntity},
    value_objects::{enums::media_kinds::MediaKind, storage::StoredObject},
};

#[derive(Debug, Clone, Validate)]
pub struct CreateMediaAssetModel {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

impl CreateMediaAssetModel {
    pub fn to_entity(&self, kind: MediaKind, object: &StoredObject) -> InsertMediaAssetEntity {
        InsertMediaAssetEntity {
            kind: kind.to_string(),
            title: self.title.clone(),
            object_key: object.key.clone(),
            url: object.url.clone(),
            content_type: object.content_type.clone(),
            size_bytes: i64::try_from(object.size_bytes).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MediaAssetDto {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<MediaAssetEntity> for MediaAssetDto {
    fn from(value: MediaAssetEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            url: value.url,
            content_type: value.content_type,
            size_bytes: value.size_bytes,
            created_at: value.created_at,
        }
    }
}
