use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::blogs},
};
use domain::{
    entities::blogs::{BlogEntity, InsertBlogEntity, UpdateBlogEntity},
    repositories::blogs::BlogRepository,
};

pub struct BlogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BlogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BlogRepository for BlogPostgres {
    async fn list(&self, published_only: bool) -> Result<Vec<BlogEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = blogs::table
            .order(blogs::created_at.desc())
            .select(BlogEntity::as_select())
            .into_boxed();

        if published_only {
            query = query.filter(blogs::published.eq(true));
        }

        let results = query.load::<BlogEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, blog_id: i64) -> Result<Option<BlogEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let blog = blogs::table
            .filter(blogs::id.eq(blog_id))
            .select(BlogEntity::as_select())
            .first::<BlogEntity>(&mut conn)
            .optional()?;

        Ok(blog)
    }

    async fn insert(&self, blog: InsertBlogEntity) -> Result<BlogEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(blogs::table)
            .values(&blog)
            .returning(BlogEntity::as_returning())
            .get_result::<BlogEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn update(&self, blog_id: i64, changes: UpdateBlogEntity) -> Result<Option<BlogEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(blogs::table)
            .filter(blogs::id.eq(blog_id))
            .set(&changes)
            .returning(BlogEntity::as_returning())
            .get_result::<BlogEntity>(&mut conn)
            .optional()?;

        Ok(updated)
    }

    async fn delete(&self, blog_id: i64) -> Result<Option<BlogEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(blogs::table)
            .filter(blogs::id.eq(blog_id))
            .returning(BlogEntity::as_returning())
            .get_result::<BlogEntity>(&mut conn)
            .optional()?;

        Ok(deleted)
    }
}
