use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::{
    entities::orders::{InsertOrderEntity, OrderEntity},
    value_objects::{
        enums::order_statuses::OrderStatus,
        orders::{StatusTransition, TransitionOutcome},
    },
};

#[automock]
#[async_trait]
pub trait OrderRepository {
    async fn insert(&self, order: InsertOrderEntity) -> Result<OrderEntity>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderEntity>>;

    /// Applies `transition` only if the stored status still allows it, in a single
    /// conditional update.
    async fn transition(
        &self,
        order_id: &str,
        transition: StatusTransition,
    ) -> Result<TransitionOutcome>;

    /// Sets the pending-mail marker if the order is still `PENDING` and no reminder was
    /// sent yet. A parked order can be claimed again. Returns whether this caller won
    /// the marker.
    async fn claim_pending_mail(&self, order_id: &str) -> Result<bool>;

    /// Clears a claimed marker so the next sweep picks the order up again.
    async fn release_pending_mail(&self, order_id: &str) -> Result<()>;

    /// Swaps a claimed marker for `PENDING_FAILED`, which takes the order out of
    /// `list_stale_pending`.
    async fn park_pending_mail(&self, order_id: &str) -> Result<()>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<OrderEntity>>;

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<OrderEntity>>;

    /// Oldest first. Only orders without any marker are listed.
    async fn list_stale_pending(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<OrderEntity>>;
}
