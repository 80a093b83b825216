use anyhow::Result;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::value_objects::enums::{mail_markers::MailMarker, order_statuses::OrderStatus};
use crate::infra::db::postgres::schema::payments;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct OrderEntity {
    pub id: i64,
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub user_id: i64,
    pub event_id: i64,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub mail_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderEntity {
    pub fn status(&self) -> Result<OrderStatus> {
        OrderStatus::try_from(self.status.as_str())
    }

    pub fn pending_mail_sent(&self) -> bool {
        self.mail_status.as_deref() == Some(MailMarker::PendingSent.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertOrderEntity {
    pub order_id: String,
    pub user_id: i64,
    pub event_id: i64,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
}

/// Columns a status transition may touch. `None` leaves the column as stored, so the
/// amount and the foreign keys are never part of an update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = payments)]
pub struct OrderStatusChangeset {
    pub status: String,
    pub transaction_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}
