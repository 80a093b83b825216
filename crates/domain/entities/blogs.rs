use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::blogs;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = blogs)]
pub struct BlogEntity {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub cover_url: Option<String>,
    pub cover_key: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blogs)]
pub struct InsertBlogEntity {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub cover_url: Option<String>,
    pub cover_key: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = blogs)]
pub struct UpdateBlogEntity {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_url: Option<String>,
    pub cover_key: Option<String>,
    pub published: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}
