use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::media_assets;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = media_assets)]
pub struct MediaAssetEntity {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub object_key: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = media_assets)]
pub struct InsertMediaAssetEntity {
    pub kind: String,
    pub title: String,
    pub object_key: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
}
