use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::{
        blogs::{BlogEntity, InsertBlogEntity, UpdateBlogEntity},
        comments::CommentEntity,
    },
    value_objects::storage::StoredObject,
};

#[derive(Debug, Clone, Validate)]
pub struct CreateBlogModel {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub published: bool,
}

impl CreateBlogModel {
    pub fn to_entity(&self, author_id: i64, cover: Option<&StoredObject>) -> InsertBlogEntity {
        InsertBlogEntity {
            author_id,
            title: self.title.clone(),
            content: self.content.clone(),
            cover_url: cover.map(|object| object.url.clone()),
            cover_key: cover.map(|object| object.key.clone()),
            published: self.published,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateBlogModel {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl UpdateBlogModel {
    pub fn to_entity(&self, cover: Option<&StoredObject>) -> UpdateBlogEntity {
        UpdateBlogEntity {
            title: self.title.clone(),
            content: self.content.clone(),
            cover_url: cover.map(|object| object.url.clone()),
            cover_key: cover.map(|object| object.key.clone()),
            published: self.published,
            updated_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlogDto {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub cover_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogEntity> for BlogDto {
    fn from(value: BlogEntity) -> Self {
        Self {
            id: value.id,
            author_id: value.author_id,
            title: value.title,
            content: value.content,
            cover_url: value.cover_url,
            published: value.published,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentDto {
    pub id: i64,
    pub blog_id: i64,
    pub user_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentEntity> for CommentDto {
    fn from(value: CommentEntity) -> Self {
        Self {
            id: value.id,
            blog_id: value.blog_id,
            user_id: value.user_id,
            body: value.body,
            created_at: value.created_at,
        }
    }
}
