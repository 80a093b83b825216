use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl, delete, insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::events},
};
use domain::{
    entities::events::{EventEntity, InsertEventEntity, UpdateEventEntity},
    repositories::events::EventRepository,
    value_objects::events::EventDeletion,
};

pub struct EventPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl EventPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl EventRepository for EventPostgres {
    async fn list(&self) -> Result<Vec<EventEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = events::table
            .order(events::starts_at.asc())
            .select(EventEntity::as_select())
            .load::<EventEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, event_id: i64) -> Result<Option<EventEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let event = events::table
            .filter(events::id.eq(event_id))
            .select(EventEntity::as_select())
            .first::<EventEntity>(&mut conn)
            .optional()?;

        Ok(event)
    }

    async fn insert(&self, event: InsertEventEntity) -> Result<EventEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(events::table)
            .values(&event)
            .returning(EventEntity::as_returning())
            .get_result::<EventEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn update(
        &self,
        event_id: i64,
        changes: UpdateEventEntity,
    ) -> Result<Option<EventEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(events::table)
            .filter(events::id.eq(event_id))
            .set(&changes)
            .returning(EventEntity::as_returning())
            .get_result::<EventEntity>(&mut conn)
            .optional()?;

        Ok(updated)
    }

    async fn delete(&self, event_id: i64) -> Result<EventDeletion> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(events::table)
            .filter(events::id.eq(event_id))
            .returning(EventEntity::as_returning())
            .get_result::<EventEntity>(&mut conn);

        match deleted {
            Ok(event) => Ok(EventDeletion::Deleted(event)),
            Err(DieselError::NotFound) => Ok(EventDeletion::NotFound),
            // payments.event_id
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                Ok(EventDeletion::Referenced)
            }
            Err(err) => Err(err.into()),
        }
    }
}
