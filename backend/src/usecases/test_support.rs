//! In-memory stand-ins shared by the use case tests.

use std::{collections::HashMap, sync::Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use eventhub::domain::{
    entities::{
        events::EventEntity,
        orders::{InsertOrderEntity, OrderEntity},
        users::UserEntity,
    },
    repositories::orders::OrderRepository,
    value_objects::{
        enums::{mail_markers::MailMarker, order_statuses::OrderStatus},
        orders::{StatusTransition, TransitionOutcome},
    },
};

/// Applies every write under one lock, so the check and the write are as atomic as the
/// conditional UPDATE they stand in for.
#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<HashMap<String, OrderEntity>>,
    next_id: Mutex<i64>,
}

impl InMemoryOrders {
    pub fn with(orders: Vec<OrderEntity>) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for order in orders {
                rows.insert(order.order_id.clone(), order);
            }
        }
        store
    }

    pub fn get(&self, order_id: &str) -> Option<OrderEntity> {
        self.rows.lock().unwrap().get(order_id).cloned()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn insert(&self, order: InsertOrderEntity) -> Result<OrderEntity> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&order.order_id) {
            anyhow::bail!("duplicate key value violates unique constraint");
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let now = Utc::now();
        let entity = OrderEntity {
            id: *next_id,
            order_id: order.order_id,
            transaction_id: None,
            user_id: order.user_id,
            event_id: order.event_id,
            amount_minor: order.amount_minor,
            currency: order.currency,
            status: order.status,
            mail_status: None,
            created_at: now,
            updated_at: now,
        };
        rows.insert(entity.order_id.clone(), entity.clone());
        Ok(entity)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderEntity>> {
        Ok(self.get(order_id))
    }

    async fn transition(
        &self,
        order_id: &str,
        transition: StatusTransition,
    ) -> Result<TransitionOutcome> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(order_id) else {
            return Ok(TransitionOutcome::NotFound);
        };

        if row.status != transition.required_status().as_str() {
            return Ok(TransitionOutcome::Unchanged(row.clone()));
        }

        row.status = transition.target().as_str().to_string();
        if let Some(transaction_id) = transition.transaction_id() {
            row.transaction_id = Some(transaction_id.to_string());
        }
        row.updated_at = Utc::now();
        Ok(TransitionOutcome::Applied(row.clone()))
    }

    async fn claim_pending_mail(&self, order_id: &str) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(order_id) {
            Some(row)
                if row.status == OrderStatus::Pending.as_str() && !row.pending_mail_sent() =>
            {
                row.mail_status = Some(MailMarker::PendingSent.as_str().to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_pending_mail(&self, order_id: &str) -> Result<()> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(order_id) {
            if row.pending_mail_sent() {
                row.mail_status = None;
            }
        }
        Ok(())
    }

    async fn park_pending_mail(&self, order_id: &str) -> Result<()> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(order_id) {
            if row.pending_mail_sent() {
                row.mail_status = Some(MailMarker::PendingFailed.as_str().to_string());
            }
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<OrderEntity>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<OrderEntity>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| status.is_none_or(|status| row.status == status.as_str()))
            .cloned()
            .collect())
    }

    async fn list_stale_pending(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<OrderEntity>> {
        let mut stale: Vec<OrderEntity> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| {
                row.status == OrderStatus::Pending.as_str()
                    && row.mail_status.is_none()
                    && row.created_at < created_before
            })
            .cloned()
            .collect();
        stale.sort_by_key(|row| row.created_at);
        stale.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(stale)
    }
}

pub fn order(order_id: &str, status: OrderStatus) -> OrderEntity {
    let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
    OrderEntity {
        id: 1,
        order_id: order_id.to_string(),
        transaction_id: None,
        user_id: 7,
        event_id: 3,
        amount_minor: 1500,
        currency: "INR".to_string(),
        status: status.as_str().to_string(),
        mail_status: None,
        created_at,
        updated_at: created_at,
    }
}

pub fn user(user_id: i64) -> UserEntity {
    UserEntity {
        id: user_id,
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        role: "user".to_string(),
        created_at: Utc::now() - Duration::days(30),
    }
}

pub fn event(event_id: i64) -> EventEntity {
    let now = Utc::now();
    EventEntity {
        id: event_id,
        title: "Founders Meetup".to_string(),
        description: "Evening of talks".to_string(),
        venue: Some("Bengaluru".to_string()),
        starts_at: now + Duration::days(10),
        price_minor: 1500,
        image_url: None,
        image_key: None,
        created_at: now,
        updated_at: now,
    }
}
