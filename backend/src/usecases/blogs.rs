use std::sync::Arc;

use eventhub::domain::{
    entities::comments::InsertCommentEntity,
    repositories::{blogs::BlogRepository, comments::CommentRepository},
    value_objects::{
        blogs::{BlogDto, CommentDto, CreateBlogModel, CreateCommentRequest, UpdateBlogModel},
        storage::StoredObject,
    },
};
use tracing::{error, info, warn};
use validator::Validate;

use super::{
    content::{Caller, ContentError, ContentResult},
    uploads::{MediaStore, TempUpload},
};

const COVER_PREFIX: &str = "blogs";

pub struct BlogUseCase {
    blogs: Arc<dyn BlogRepository + Send + Sync>,
    comments: Arc<dyn CommentRepository + Send + Sync>,
    media: Arc<MediaStore>,
}

impl BlogUseCase {
    pub fn new(
        blogs: Arc<dyn BlogRepository + Send + Sync>,
        comments: Arc<dyn CommentRepository + Send + Sync>,
        media: Arc<MediaStore>,
    ) -> Self {
        Self {
            blogs,
            comments,
            media,
        }
    }

    /// Drafts are only included for admins.
    pub async fn list(&self, include_drafts: bool) -> ContentResult<Vec<BlogDto>> {
        let blogs = self.blogs.list(!include_drafts).await.map_err(|err| {
            error!(db_error = ?err, "blogs: failed to list");
            ContentError::Internal(err)
        })?;

        Ok(blogs.into_iter().map(BlogDto::from).collect())
    }

    pub async fn get(&self, blog_id: i64, include_drafts: bool) -> ContentResult<BlogDto> {
        match self.blogs.find_by_id(blog_id).await? {
            Some(blog) if blog.published || include_drafts => Ok(BlogDto::from(blog)),
            _ => Err(ContentError::NotFound("blog")),
        }
    }

    pub async fn create(
        &self,
        author_id: i64,
        model: CreateBlogModel,
        cover: Option<TempUpload>,
    ) -> ContentResult<BlogDto> {
        model.validate()?;
        let stored = self.store_cover(cover.as_ref()).await?;

        match self.blogs.insert(model.to_entity(author_id, stored.as_ref())).await {
            Ok(blog) => {
                info!(blog_id = blog.id, author_id, "blogs: created");
                Ok(BlogDto::from(blog))
            }
            Err(err) => {
                error!(author_id, db_error = ?err, "blogs: failed to insert");
                self.discard(stored.as_ref()).await;
                Err(ContentError::Internal(err))
            }
        }
    }

    pub async fn update(
        &self,
        blog_id: i64,
        model: UpdateBlogModel,
        cover: Option<TempUpload>,
    ) -> ContentResult<BlogDto> {
        model.validate()?;
        let previous = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or(ContentError::NotFound("blog"))?;

        let stored = self.store_cover(cover.as_ref()).await?;

        let updated = match self.blogs.update(blog_id, model.to_entity(stored.as_ref())).await {
            Ok(Some(blog)) => blog,
            Ok(None) => {
                self.discard(stored.as_ref()).await;
                return Err(ContentError::NotFound("blog"));
            }
            Err(err) => {
                error!(blog_id, db_error = ?err, "blogs: failed to update");
                self.discard(stored.as_ref()).await;
                return Err(ContentError::Internal(err));
            }
        };

        if stored.is_some() {
            if let Some(old_key) = previous.cover_key.as_deref() {
                self.media.discard(old_key).await;
            }
        }

        info!(blog_id, "blogs: updated");
        Ok(BlogDto::from(updated))
    }

    pub async fn delete(&self, blog_id: i64) -> ContentResult<()> {
        let deleted = self
            .blogs
            .delete(blog_id)
            .await?
            .ok_or(ContentError::NotFound("blog"))?;

        if let Some(key) = deleted.cover_key.as_deref() {
            self.media.discard(key).await;
        }

        info!(blog_id, "blogs: deleted");
        Ok(())
    }

    pub async fn list_comments(&self, blog_id: i64) -> ContentResult<Vec<CommentDto>> {
        self.get(blog_id, false).await?;

        let comments = self.comments.list_for_blog(blog_id).await?;
        Ok(comments.into_iter().map(CommentDto::from).collect())
    }

    pub async fn add_comment(
        &self,
        blog_id: i64,
        user_id: i64,
        request: CreateCommentRequest,
    ) -> ContentResult<CommentDto> {
        request.validate()?;
        self.get(blog_id, false).await?;

        let comment = self
            .comments
            .insert(InsertCommentEntity {
                blog_id,
                user_id,
                body: request.body.trim().to_string(),
            })
            .await?;

        info!(blog_id, user_id, comment_id = comment.id, "blogs: comment added");
        Ok(CommentDto::from(comment))
    }

    pub async fn delete_comment(&self, comment_id: i64, caller: Caller) -> ContentResult<()> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(ContentError::NotFound("comment"))?;

        if !caller.may_modify(comment.user_id) {
            warn!(comment_id, user_id = caller.user_id, "blogs: comment delete forbidden");
            return Err(ContentError::Forbidden("delete this comment"));
        }

        if !self.comments.soft_delete(comment_id).await? {
            return Err(ContentError::NotFound("comment"));
        }

        info!(comment_id, user_id = caller.user_id, "blogs: comment deleted");
        Ok(())
    }

    async fn store_cover(&self, cover: Option<&TempUpload>) -> ContentResult<Option<StoredObject>> {
        let Some(upload) = cover else {
            return Ok(None);
        };
        if !upload.is_image() {
            return Err(ContentError::Validation(
                "blog cover must be an image".to_string(),
            ));
        }

        Ok(Some(self.media.store(COVER_PREFIX, upload).await?))
    }

    async fn discard(&self, stored: Option<&StoredObject>) {
        if let Some(object) = stored {
            self.media.discard(&object.key).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eventhub::domain::{
        entities::{blogs::BlogEntity, comments::CommentEntity},
        repositories::{
            blogs::MockBlogRepository, comments::MockCommentRepository,
            storage::MockObjectStorage,
        },
    };

    fn blog(id: i64, published: bool) -> BlogEntity {
        let now = Utc::now();
        BlogEntity {
            id,
            author_id: 1,
            title: "Launch notes".to_string(),
            content: "We shipped".to_string(),
            cover_url: None,
            cover_key: None,
            published,
            created_at: now,
            updated_at: now,
        }
    }

    fn comment(id: i64, user_id: i64) -> CommentEntity {
        CommentEntity {
            id,
            blog_id: 5,
            user_id,
            body: "Nice".to_string(),
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    fn usecase(blogs: MockBlogRepository, comments: MockCommentRepository) -> BlogUseCase {
        let media = Arc::new(MediaStore::new(Arc::new(MockObjectStorage::new()), "media".into()));
        BlogUseCase::new(Arc::new(blogs), Arc::new(comments), media)
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_readers() {
        let mut blogs = MockBlogRepository::new();
        blogs.expect_find_by_id().returning(|id| Ok(Some(blog(id, false))));
        let usecase = usecase(blogs, MockCommentRepository::new());

        let err = usecase.get(5, false).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound("blog")));

        let draft = usecase.get(5, true).await.unwrap();
        assert!(!draft.published);
    }

    #[tokio::test]
    async fn comment_on_published_blog() {
        let mut blogs = MockBlogRepository::new();
        blogs.expect_find_by_id().returning(|id| Ok(Some(blog(id, true))));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .withf(|entity| entity.blog_id == 5 && entity.user_id == 7 && entity.body == "Great post")
            .returning(|entity| {
                Ok(CommentEntity {
                    id: 1,
                    blog_id: entity.blog_id,
                    user_id: entity.user_id,
                    body: entity.body,
                    is_deleted: false,
                    created_at: Utc::now(),
                })
            });
        let usecase = usecase(blogs, comments);

        let created = usecase
            .add_comment(
                5,
                7,
                CreateCommentRequest {
                    body: "  Great post ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.body, "Great post");
    }

    #[tokio::test]
    async fn only_owner_or_admin_can_delete_comment() {
        let mut comments = MockCommentRepository::new();
        comments.expect_find_by_id().returning(|id| Ok(Some(comment(id, 7))));
        comments.expect_soft_delete().times(2).returning(|_| Ok(true));
        let usecase = usecase(MockBlogRepository::new(), comments);

        let stranger = Caller {
            user_id: 8,
            is_admin: false,
        };
        let err = usecase.delete_comment(1, stranger).await.unwrap_err();
        assert!(matches!(err, ContentError::Forbidden(_)));

        let owner = Caller {
            user_id: 7,
            is_admin: false,
        };
        usecase.delete_comment(1, owner).await.unwrap();

        let admin = Caller {
            user_id: 1,
            is_admin: true,
        };
        usecase.delete_comment(1, admin).await.unwrap();
    }

    #[tokio::test]
    async fn deleted_comment_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments.expect_find_by_id().returning(|_| Ok(None));
        let usecase = usecase(MockBlogRepository::new(), comments);

        let caller = Caller {
            user_id: 7,
            is_admin: false,
        };
        let err = usecase.delete_comment(1, caller).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound("comment")));
    }
}
