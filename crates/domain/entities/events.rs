use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::events;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = events)]
pub struct EventEntity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub price_minor: i64,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub struct InsertEventEntity {
    pub title: String,
    pub description: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub price_minor: i64,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEventEntity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub price_minor: Option<i64>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
