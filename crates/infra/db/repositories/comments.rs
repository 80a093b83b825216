use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::comments},
};
use domain::{
    entities::comments::{CommentEntity, InsertCommentEntity},
    repositories::comments::CommentRepository,
};

pub struct CommentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CommentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CommentRepository for CommentPostgres {
    async fn list_for_blog(&self, blog_id: i64) -> Result<Vec<CommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = comments::table
            .filter(comments::blog_id.eq(blog_id))
            .filter(comments::is_deleted.eq(false))
            .order(comments::created_at.asc())
            .select(CommentEntity::as_select())
            .load::<CommentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, comment_id: i64) -> Result<Option<CommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let comment = comments::table
            .filter(comments::id.eq(comment_id))
            .filter(comments::is_deleted.eq(false))
            .select(CommentEntity::as_select())
            .first::<CommentEntity>(&mut conn)
            .optional()?;

        Ok(comment)
    }

    async fn insert(&self, comment: InsertCommentEntity) -> Result<CommentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(comments::table)
            .values(&comment)
            .returning(CommentEntity::as_returning())
            .get_result::<CommentEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn soft_delete(&self, comment_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(comments::table)
            .filter(comments::id.eq(comment_id))
            .filter(comments::is_deleted.eq(false))
            .set(comments::is_deleted.eq(true))
            .execute(&mut conn)?;

        Ok(affected == 1)
    }
}
