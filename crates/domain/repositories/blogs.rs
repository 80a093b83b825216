use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::blogs::{BlogEntity, InsertBlogEntity, UpdateBlogEntity};

#[automock]
#[async_trait]
pub trait BlogRepository {
    async fn list(&self, published_only: bool) -> Result<Vec<BlogEntity>>;

    async fn find_by_id(&self, blog_id: i64) -> Result<Option<BlogEntity>>;

    async fn insert(&self, blog: InsertBlogEntity) -> Result<BlogEntity>;

    async fn update(&self, blog_id: i64, changes: UpdateBlogEntity) -> Result<Option<BlogEntity>>;

    async fn delete(&self, blog_id: i64) -> Result<Option<BlogEntity>>;
}
