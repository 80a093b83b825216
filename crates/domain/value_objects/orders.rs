use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{entities::orders::OrderEntity, value_objects::enums::order_statuses::OrderStatus};

/// A status write against one order. Each variant is only accepted while the stored
/// status equals [`StatusTransition::required_status`]; the check and the write happen
/// in the same statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransition {
    Succeed { transaction_id: String },
    Fail { transaction_id: Option<String> },
    KeepPending,
    Refund,
}

impl StatusTransition {
    pub fn target(&self) -> OrderStatus {
        match self {
            StatusTransition::Succeed { .. } => OrderStatus::Success,
            StatusTransition::Fail { .. } => OrderStatus::Failed,
            StatusTransition::KeepPending => OrderStatus::Pending,
            StatusTransition::Refund => OrderStatus::Refunded,
        }
    }

    pub fn required_status(&self) -> OrderStatus {
        match self {
            StatusTransition::Refund => OrderStatus::Success,
            _ => OrderStatus::Pending,
        }
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            StatusTransition::Succeed { transaction_id } => Some(transaction_id),
            StatusTransition::Fail { transaction_id } => transaction_id.as_deref(),
            StatusTransition::KeepPending | StatusTransition::Refund => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The write was accepted; carries the row as written.
    Applied(OrderEntity),
    /// The stored status did not allow the write; carries the row as stored.
    Unchanged(OrderEntity),
    NotFound,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(range(min = 1, message = "amount must be greater than zero"))]
    pub amount: i64,
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(range(min = 1))]
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateOrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, message = "razorpay_order_id is required"))]
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub status: OrderStatus,
}

/// `status` is the stored status after the call. `success` is false only when the
/// callback was rejected and the order is now `FAILED`; a rejected callback against an
/// already finalized order leaves it untouched and reports that order's state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendEmailRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub event_title: String,
    #[validate(range(min = 0))]
    pub amount: i64,
    #[validate(length(min = 1))]
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub payment_status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PendingCheckRequest {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PendingCheckResponse {
    pub success: bool,
    pub status: OrderStatus,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefundRequest {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderDto {
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub user_id: i64,
    pub event_id: i64,
    pub amount: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub pending_mail_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderEntity> for OrderDto {
    type Error = anyhow::Error;

    fn try_from(value: OrderEntity) -> Result<Self> {
        let status = value.status()?;
        let pending_mail_sent = value.pending_mail_sent();
        Ok(Self {
            order_id: value.order_id,
            transaction_id: value.transaction_id,
            user_id: value.user_id,
            event_id: value.event_id,
            amount: value.amount_minor,
            currency: value.currency,
            status,
            pending_mail_sent,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_is_the_only_transition_out_of_success() {
        assert_eq!(StatusTransition::Refund.required_status(), OrderStatus::Success);
        for transition in [
            StatusTransition::Succeed {
                transaction_id: "pay_1".to_string(),
            },
            StatusTransition::Fail {
                transaction_id: None,
            },
            StatusTransition::KeepPending,
        ] {
            assert_eq!(transition.required_status(), OrderStatus::Pending);
        }
    }

    #[test]
    fn create_order_rejects_non_positive_amount() {
        let request = CreateOrderRequest {
            amount: 0,
            user_id: 7,
            event_id: 3,
        };
        assert!(request.validate().is_err());

        let request = CreateOrderRequest {
            amount: 1500,
            user_id: 7,
            event_id: 3,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_order_response_uses_camel_case_order_id() {
        let response = CreateOrderResponse {
            order_id: "order_abc".to_string(),
            amount: 1500,
            currency: "INR".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["orderId"], "order_abc");
        assert_eq!(json["amount"], 1500);
    }
}
