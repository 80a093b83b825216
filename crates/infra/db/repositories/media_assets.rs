use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::media_assets},
};
use domain::{
    entities::media_assets::{InsertMediaAssetEntity, MediaAssetEntity},
    repositories::media_assets::MediaAssetRepository,
    value_objects::enums::media_kinds::MediaKind,
};

pub struct MediaAssetPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MediaAssetPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MediaAssetRepository for MediaAssetPostgres {
    async fn list(&self, kind: MediaKind) -> Result<Vec<MediaAssetEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = media_assets::table
            .filter(media_assets::kind.eq(kind.as_str()))
            .order(media_assets::created_at.desc())
            .select(MediaAssetEntity::as_select())
            .load::<MediaAssetEntity>(&mut conn)?;

        Ok(results)
    }

    async fn insert(&self, asset: InsertMediaAssetEntity) -> Result<MediaAssetEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(media_assets::table)
            .values(&asset)
            .returning(MediaAssetEntity::as_returning())
            .get_result::<MediaAssetEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn delete(&self, kind: MediaKind, asset_id: i64) -> Result<Option<MediaAssetEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(media_assets::table)
            .filter(media_assets::id.eq(asset_id))
            .filter(media_assets::kind.eq(kind.as_str()))
            .returning(MediaAssetEntity::as_returning())
            .get_result::<MediaAssetEntity>(&mut conn)
            .optional()?;

        Ok(deleted)
    }
}
