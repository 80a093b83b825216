use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::events::{EventEntity, InsertEventEntity, UpdateEventEntity},
    value_objects::events::EventDeletion,
};

#[automock]
#[async_trait]
pub trait EventRepository {
    async fn list(&self) -> Result<Vec<EventEntity>>;

    async fn find_by_id(&self, event_id: i64) -> Result<Option<EventEntity>>;

    async fn insert(&self, event: InsertEventEntity) -> Result<EventEntity>;

    async fn update(
        &self,
        event_id: i64,
        changes: UpdateEventEntity,
    ) -> Result<Option<EventEntity>>;

    /// Orders keep their event, so an event with orders is reported as `Referenced`
    /// and left in place.
    async fn delete(&self, event_id: i64) -> Result<EventDeletion>;
}
