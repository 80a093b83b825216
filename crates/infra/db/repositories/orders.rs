use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::payments},
};
use domain::{
    entities::orders::{InsertOrderEntity, OrderEntity, OrderStatusChangeset},
    repositories::orders::OrderRepository,
    value_objects::{
        enums::{mail_markers::MailMarker, order_statuses::OrderStatus},
        orders::{StatusTransition, TransitionOutcome},
    },
};

pub struct OrderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrderRepository for OrderPostgres {
    async fn insert(&self, order: InsertOrderEntity) -> Result<OrderEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(payments::table)
            .values(&order)
            .returning(OrderEntity::as_returning())
            .get_result::<OrderEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let order = payments::table
            .filter(payments::order_id.eq(order_id))
            .select(OrderEntity::as_select())
            .first::<OrderEntity>(&mut conn)
            .optional()?;

        Ok(order)
    }

    async fn transition(
        &self,
        order_id: &str,
        transition: StatusTransition,
    ) -> Result<TransitionOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let changes = OrderStatusChangeset {
            status: transition.target().to_string(),
            transaction_id: transition.transaction_id().map(str::to_string),
            updated_at: Utc::now(),
        };

        // UPDATE payments SET ... WHERE order_id = $1 AND status = $2 RETURNING *
        let applied = update(payments::table)
            .filter(payments::order_id.eq(order_id))
            .filter(payments::status.eq(transition.required_status().as_str()))
            .set(&changes)
            .returning(OrderEntity::as_returning())
            .get_result::<OrderEntity>(&mut conn)
            .optional()?;

        if let Some(order) = applied {
            return Ok(TransitionOutcome::Applied(order));
        }

        let current = payments::table
            .filter(payments::order_id.eq(order_id))
            .select(OrderEntity::as_select())
            .first::<OrderEntity>(&mut conn)
            .optional()?;

        Ok(match current {
            Some(order) => TransitionOutcome::Unchanged(order),
            None => TransitionOutcome::NotFound,
        })
    }

    async fn claim_pending_mail(&self, order_id: &str) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let claimed = update(payments::table)
            .filter(payments::order_id.eq(order_id))
            .filter(payments::status.eq(OrderStatus::Pending.as_str()))
            // NULL or PENDING_FAILED
            .filter(payments::mail_status.is_distinct_from(MailMarker::PendingSent.as_str()))
            .set((
                payments::mail_status.eq(Some(MailMarker::PendingSent.as_str())),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(claimed == 1)
    }

    async fn release_pending_mail(&self, order_id: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(payments::table)
            .filter(payments::order_id.eq(order_id))
            .filter(payments::mail_status.eq(MailMarker::PendingSent.as_str()))
            .set((
                payments::mail_status.eq(None::<String>),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn park_pending_mail(&self, order_id: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(payments::table)
            .filter(payments::order_id.eq(order_id))
            .filter(payments::mail_status.eq(MailMarker::PendingSent.as_str()))
            .set((
                payments::mail_status.eq(Some(MailMarker::PendingFailed.as_str())),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let orders = payments::table
            .filter(payments::user_id.eq(user_id))
            .order(payments::created_at.desc())
            .select(OrderEntity::as_select())
            .load::<OrderEntity>(&mut conn)?;

        Ok(orders)
    }

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payments::table
            .order(payments::created_at.desc())
            .select(OrderEntity::as_select())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(payments::status.eq(status.as_str()));
        }

        let orders = query.load::<OrderEntity>(&mut conn)?;

        Ok(orders)
    }

    async fn list_stale_pending(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let orders = payments::table
            .filter(payments::status.eq(OrderStatus::Pending.as_str()))
            .filter(payments::mail_status.is_null())
            .filter(payments::created_at.lt(created_before))
            .order(payments::created_at.asc())
            .limit(limit)
            .select(OrderEntity::as_select())
            .load::<OrderEntity>(&mut conn)?;

        Ok(orders)
    }
}
