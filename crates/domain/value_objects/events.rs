use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::domain::{
    entities::events::{EventEntity, InsertEventEntity, UpdateEventEntity},
    value_objects::storage::StoredObject,
};

#[derive(Debug, Clone, Validate)]
pub struct CreateEventModel {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[validate(range(min = 0))]
    pub price_minor: i64,
}

impl CreateEventModel {
    pub fn to_entity(&self, image: Option<&StoredObject>) -> InsertEventEntity {
        InsertEventEntity {
            title: self.title.clone(),
            description: self.description.clone(),
            venue: self.venue.clone(),
            starts_at: self.starts_at,
            price_minor: self.price_minor,
            image_url: image.map(|object| object.url.clone()),
            image_key: image.map(|object| object.key.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateEventModel {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub price_minor: Option<i64>,
}

impl UpdateEventModel {
    pub fn to_entity(&self, image: Option<&StoredObject>) -> UpdateEventEntity {
        UpdateEventEntity {
            title: self.title.clone(),
            description: self.description.clone(),
            venue: self.venue.clone(),
            starts_at: self.starts_at,
            price_minor: self.price_minor,
            image_url: image.map(|object| object.url.clone()),
            image_key: image.map(|object| object.key.clone()),
            updated_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub price_minor: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for EventDto {
    fn from(value: EventEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            venue: value.venue,
            starts_at: value.starts_at,
            price_minor: value.price_minor,
            image_url: value.image_url,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Result of removing an event row.
#[derive(Debug, Clone)]
pub enum EventDeletion {
    Deleted(EventEntity),
    NotFound,
    /// Orders still point at the event.
    Referenced,
}
