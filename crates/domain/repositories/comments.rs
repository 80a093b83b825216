use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::comments::{CommentEntity, InsertCommentEntity};

#[automock]
#[async_trait]
pub trait CommentRepository {
    async fn list_for_blog(&self, blog_id: i64) -> Result<Vec<CommentEntity>>;

    async fn find_by_id(&self, comment_id: i64) -> Result<Option<CommentEntity>>;

    async fn insert(&self, comment: InsertCommentEntity) -> Result<CommentEntity>;

    /// Returns `false` when the comment does not exist or was already deleted.
    async fn soft_delete(&self, comment_id: i64) -> Result<bool>;
}
