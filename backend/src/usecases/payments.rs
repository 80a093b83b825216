use std::{collections::HashMap, sync::Arc};

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::Utc;
use eventhub::{
    domain::{
        entities::orders::{InsertOrderEntity, OrderEntity},
        repositories::{
            events::EventRepository, orders::OrderRepository, users::UserRepository,
        },
        value_objects::{
            enums::order_statuses::OrderStatus,
            orders::{
                CreateOrderRequest, CreateOrderResponse, OrderDto, StatusTransition,
                TransitionOutcome, VerifyPaymentRequest, VerifyPaymentResponse,
            },
        },
    },
    payments::razorpay_client::{RazorpayClient, RazorpayEvent, RazorpayOrder},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::notifications::{NotificationQueue, PaymentEmail, load_mail_context};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> AnyResult<RazorpayOrder>;

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str)
    -> bool;

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str)
    -> AnyResult<RazorpayEvent>;
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> AnyResult<RazorpayOrder> {
        self.create_order(amount_minor, currency, receipt, notes).await
    }

    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        self.verify_payment_signature(order_id, payment_id, signature)
    }

    fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> AnyResult<RazorpayEvent> {
        self.verify_webhook_signature(payload, signature)
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("order not found")]
    OrderNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("event not found")]
    EventNotFound,
    #[error("not allowed to {0}")]
    Forbidden(&'static str),
    #[error("invalid webhook: {0}")]
    InvalidWebhook(String),
    #[error("order is {0}; only SUCCESS orders can be refunded")]
    NotRefundable(OrderStatus),
    #[error("payment gateway request failed")]
    Gateway(#[source] anyhow::Error),
    #[error("mail delivery failed")]
    Mail(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::Validation(_) | PaymentError::InvalidWebhook(_) => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::OrderNotFound
            | PaymentError::UserNotFound
            | PaymentError::EventNotFound => StatusCode::NOT_FOUND,
            PaymentError::Forbidden(_) => StatusCode::FORBIDDEN,
            PaymentError::NotRefundable(_) => StatusCode::CONFLICT,
            PaymentError::Gateway(_) | PaymentError::Mail(_) | PaymentError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand to clients for server-side failures.
    pub fn public_message(&self) -> &'static str {
        match self {
            PaymentError::Gateway(_) => "Failed to create order",
            PaymentError::Mail(_) => "Failed to send email",
            _ => "Internal server error",
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

pub struct PaymentUseCase {
    order_repo: Arc<dyn OrderRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    event_repo: Arc<dyn EventRepository + Send + Sync>,
    gateway: Arc<dyn PaymentGateway>,
    notifications: Arc<dyn NotificationQueue>,
    currency: String,
}

impl PaymentUseCase {
    pub fn new(
        order_repo: Arc<dyn OrderRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        event_repo: Arc<dyn EventRepository + Send + Sync>,
        gateway: Arc<dyn PaymentGateway>,
        notifications: Arc<dyn NotificationQueue>,
        currency: String,
    ) -> Self {
        Self {
            order_repo,
            user_repo,
            event_repo,
            gateway,
            notifications,
            currency,
        }
    }

    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> UseCaseResult<CreateOrderResponse> {
        let CreateOrderRequest {
            amount,
            user_id,
            event_id,
        } = request;
        info!(amount, user_id, event_id, "payments: create order requested");

        if amount <= 0 {
            return Err(PaymentError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            warn!(user_id, "payments: create order for unknown user");
            return Err(PaymentError::UserNotFound);
        }
        if self.event_repo.find_by_id(event_id).await?.is_none() {
            warn!(event_id, "payments: create order for unknown event");
            return Err(PaymentError::EventNotFound);
        }

        let receipt = format!("rcpt_{}_{}_{}", user_id, event_id, Utc::now().timestamp_millis());
        let notes = HashMap::from([
            ("user_id".to_string(), user_id.to_string()),
            ("event_id".to_string(), event_id.to_string()),
        ]);

        let gateway_order = self
            .gateway
            .create_order(amount, &self.currency, &receipt, notes)
            .await
            .map_err(|err| {
                error!(
                    user_id,
                    event_id,
                    error = ?err,
                    "payments: gateway order creation failed"
                );
                PaymentError::Gateway(err)
            })?;

        let inserted = self
            .order_repo
            .insert(InsertOrderEntity {
                order_id: gateway_order.id.clone(),
                user_id,
                event_id,
                amount_minor: amount,
                currency: gateway_order.currency.clone(),
                status: OrderStatus::Pending.as_str().to_string(),
            })
            .await
            .map_err(|err| {
                // The gateway order stays unreferenced and expires on their side.
                error!(
                    orphan_order_id = %gateway_order.id,
                    user_id,
                    event_id,
                    db_error = ?err,
                    "payments: failed to store order after gateway creation"
                );
                PaymentError::Internal(err)
            })?;

        info!(order_id = %inserted.order_id, user_id, event_id, "payments: order created");

        Ok(CreateOrderResponse {
            order_id: inserted.order_id,
            amount: inserted.amount_minor,
            currency: inserted.currency,
        })
    }

    /// Reconciles a checkout callback. A client-reported success only counts when the
    /// gateway signature over `order_id|payment_id` checks out; otherwise the order fails.
    pub async fn verify(
        &self,
        request: VerifyPaymentRequest,
    ) -> UseCaseResult<VerifyPaymentResponse> {
        let order_id = request.razorpay_order_id.trim().to_string();
        if order_id.is_empty() {
            return Err(PaymentError::Validation(
                "razorpay_order_id is required".to_string(),
            ));
        }

        info!(%order_id, reported = %request.status, "payments: verification received");

        let mut signature_rejected = false;
        let transition = match request.status {
            OrderStatus::Success => {
                match (
                    request.razorpay_payment_id.as_deref(),
                    request.razorpay_signature.as_deref(),
                ) {
                    (Some(payment_id), Some(signature))
                        if self
                            .gateway
                            .verify_payment_signature(&order_id, payment_id, signature) =>
                    {
                        StatusTransition::Succeed {
                            transaction_id: payment_id.to_string(),
                        }
                    }
                    _ => {
                        warn!(%order_id, "payments: signature rejected, marking order failed");
                        signature_rejected = true;
                        StatusTransition::Fail {
                            transaction_id: request.razorpay_payment_id.clone(),
                        }
                    }
                }
            }
            OrderStatus::Failed => StatusTransition::Fail {
                transaction_id: request.razorpay_payment_id.clone(),
            },
            OrderStatus::Pending => StatusTransition::KeepPending,
            OrderStatus::Refunded => {
                return Err(PaymentError::Validation(
                    "status must be one of SUCCESS, FAILED, PENDING".to_string(),
                ));
            }
        };

        let order = self.apply(&order_id, transition).await?;
        let status = order.status()?;

        // A rejected signature cannot move a finalized order, so it only counts
        // against the caller when the order actually ended up FAILED.
        Ok(VerifyPaymentResponse {
            success: !(signature_rejected && status == OrderStatus::Failed),
            status,
        })
    }

    pub async fn handle_webhook(&self, payload: &[u8], signature: &str) -> UseCaseResult<()> {
        let event = self
            .gateway
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "payments: webhook verification failed");
                PaymentError::InvalidWebhook("signature verification failed".to_string())
            })?;

        info!(event_type = %event.event, "payments: webhook verified");

        let transition = match event.event.as_str() {
            "payment.captured" | "order.paid" => {
                let payment_id = event.payment_id().ok_or_else(|| {
                    PaymentError::InvalidWebhook("payment entity missing".to_string())
                })?;
                StatusTransition::Succeed {
                    transaction_id: payment_id.to_string(),
                }
            }
            "payment.failed" => StatusTransition::Fail {
                transaction_id: event.payment_id().map(str::to_string),
            },
            other => {
                debug!(event_type = %other, "payments: unhandled webhook event");
                return Ok(());
            }
        };

        let order_id = event
            .order_id()
            .ok_or_else(|| PaymentError::InvalidWebhook("order id missing".to_string()))?
            .to_string();

        match self.apply(&order_id, transition).await {
            Ok(_) => Ok(()),
            Err(PaymentError::OrderNotFound) => {
                // Orders created outside this service; acknowledge so the gateway stops retrying.
                warn!(%order_id, "payments: webhook for unknown order ignored");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Records an out-of-band refund. Repeating it on a refunded order is a no-op.
    pub async fn refund(&self, order_id: &str) -> UseCaseResult<OrderDto> {
        info!(%order_id, "payments: refund requested");

        match self
            .order_repo
            .transition(order_id, StatusTransition::Refund)
            .await?
        {
            TransitionOutcome::Applied(order) => {
                info!(%order_id, "payments: order refunded");
                self.notify(&order).await;
                Ok(OrderDto::try_from(order)?)
            }
            TransitionOutcome::Unchanged(order) => {
                let status = order.status()?;
                if status == OrderStatus::Refunded {
                    return Ok(OrderDto::try_from(order)?);
                }
                warn!(%order_id, %status, "payments: refund rejected");
                Err(PaymentError::NotRefundable(status))
            }
            TransitionOutcome::NotFound => Err(PaymentError::OrderNotFound),
        }
    }

    pub async fn list_for_user(&self, user_id: i64) -> UseCaseResult<Vec<OrderDto>> {
        let orders = self.order_repo.list_by_user(user_id).await.map_err(|err| {
            error!(user_id, db_error = ?err, "payments: failed to list user orders");
            PaymentError::Internal(err)
        })?;

        Ok(orders
            .into_iter()
            .map(OrderDto::try_from)
            .collect::<AnyResult<Vec<_>>>()?)
    }

    pub async fn list(&self, status: Option<OrderStatus>) -> UseCaseResult<Vec<OrderDto>> {
        let orders = self.order_repo.list(status).await.map_err(|err| {
            error!(status = ?status, db_error = ?err, "payments: failed to list orders");
            PaymentError::Internal(err)
        })?;

        Ok(orders
            .into_iter()
            .map(OrderDto::try_from)
            .collect::<AnyResult<Vec<_>>>()?)
    }

    /// Runs one conditional write and returns the row as it now stands. Rejected writes
    /// are not errors: finalized orders keep their status.
    async fn apply(
        &self,
        order_id: &str,
        transition: StatusTransition,
    ) -> UseCaseResult<OrderEntity> {
        let target = transition.target();
        let outcome = self
            .order_repo
            .transition(order_id, transition)
            .await
            .map_err(|err| {
                error!(%order_id, %target, db_error = ?err, "payments: status write failed");
                PaymentError::Internal(err)
            })?;

        match outcome {
            TransitionOutcome::Applied(order) => {
                info!(%order_id, status = %target, "payments: status updated");
                if target.is_terminal() {
                    self.notify(&order).await;
                }
                Ok(order)
            }
            TransitionOutcome::Unchanged(order) => {
                info!(
                    %order_id,
                    requested = %target,
                    current = %order.status,
                    "payments: order already finalized, update ignored"
                );
                Ok(order)
            }
            TransitionOutcome::NotFound => {
                warn!(%order_id, "payments: order not found");
                Err(PaymentError::OrderNotFound)
            }
        }
    }

    /// Best effort: the status write is already committed, so lookup failures only log.
    async fn notify(&self, order: &OrderEntity) {
        let status = match order.status() {
            Ok(status) => status,
            Err(err) => {
                error!(order_id = %order.order_id, error = ?err, "payments: unreadable status");
                return;
            }
        };

        match load_mail_context(self.user_repo.as_ref(), self.event_repo.as_ref(), order).await {
            Ok(Some(context)) => self.notifications.enqueue(PaymentEmail { status, context }),
            Ok(None) => warn!(
                order_id = %order.order_id,
                "payments: user or event missing, no mail queued"
            ),
            Err(err) => error!(
                order_id = %order.order_id,
                error = ?err,
                "payments: failed to load mail context"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::{
        notifications::MockNotificationQueue,
        test_support::{InMemoryOrders, event, order, user},
    };
    use eventhub::{
        domain::repositories::{events::MockEventRepository, users::MockUserRepository},
        payments::razorpay_client::sign_hex,
    };

    const KEY_SECRET: &[u8] = b"key_secret";

    fn users() -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok((id == 7).then(|| user(7))));
        repo
    }

    fn events() -> MockEventRepository {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok((id == 3).then(|| event(3))));
        repo
    }

    /// Gateway that signs like Razorpay with a fixed key.
    fn gateway() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_payment_signature()
            .returning(|order_id, payment_id, signature| {
                sign_hex(KEY_SECRET, format!("{}|{}", order_id, payment_id).as_bytes())
                    == signature
            });
        gateway
    }

    fn quiet_queue() -> MockNotificationQueue {
        let mut queue = MockNotificationQueue::new();
        queue.expect_enqueue().returning(|_| ());
        queue
    }

    fn usecase(
        orders: Arc<InMemoryOrders>,
        gateway: MockPaymentGateway,
        queue: MockNotificationQueue,
    ) -> PaymentUseCase {
        PaymentUseCase::new(
            orders,
            Arc::new(users()),
            Arc::new(events()),
            Arc::new(gateway),
            Arc::new(queue),
            "INR".to_string(),
        )
    }

    fn verify_request(
        status: OrderStatus,
        payment_id: Option<&str>,
        signature: Option<String>,
    ) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            razorpay_order_id: "order_abc".to_string(),
            razorpay_payment_id: payment_id.map(str::to_string),
            razorpay_signature: signature,
            status,
        }
    }

    #[tokio::test]
    async fn happy_path_create_then_verify() {
        let orders = Arc::new(InMemoryOrders::default());
        let mut gateway = gateway();
        gateway
            .expect_create_order()
            .times(1)
            .returning(|amount, currency, _, _| {
                Ok(RazorpayOrder {
                    id: "order_abc".to_string(),
                    amount,
                    currency: currency.to_string(),
                    receipt: None,
                    status: "created".to_string(),
                })
            });

        let mut queue = MockNotificationQueue::new();
        queue
            .expect_enqueue()
            .withf(|email| {
                email.status == OrderStatus::Success
                    && email.context.transaction_id.as_deref() == Some("pay_1")
                    && email.context.to_email == "asha@example.com"
            })
            .times(1)
            .returning(|_| ());

        let usecase = usecase(Arc::clone(&orders), gateway, queue);

        let created = usecase
            .create_order(CreateOrderRequest {
                amount: 1500,
                user_id: 7,
                event_id: 3,
            })
            .await
            .unwrap();
        assert_eq!(created.order_id, "order_abc");
        assert_eq!(created.amount, 1500);
        assert_eq!(orders.get("order_abc").unwrap().status, "PENDING");

        let signature = sign_hex(KEY_SECRET, b"order_abc|pay_1");
        let verified = usecase
            .verify(verify_request(OrderStatus::Success, Some("pay_1"), Some(signature)))
            .await
            .unwrap();

        assert_eq!(
            verified,
            VerifyPaymentResponse {
                success: true,
                status: OrderStatus::Success
            }
        );
        let stored = orders.get("order_abc").unwrap();
        assert_eq!(stored.status, "SUCCESS");
        assert_eq!(stored.transaction_id.as_deref(), Some("pay_1"));
        assert_eq!(stored.amount_minor, 1500);
    }

    #[tokio::test]
    async fn tampered_signature_fails_the_order() {
        let orders = Arc::new(InMemoryOrders::with(vec![order(
            "order_abc",
            OrderStatus::Pending,
        )]));
        let usecase = usecase(Arc::clone(&orders), gateway(), quiet_queue());

        let tampered = sign_hex(KEY_SECRET, b"order_abc|pay_2");
        let response = usecase
            .verify(verify_request(OrderStatus::Success, Some("pay_1"), Some(tampered)))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.status, OrderStatus::Failed);
        assert_eq!(orders.get("order_abc").unwrap().status, "FAILED");
    }

    #[tokio::test]
    async fn tampered_signature_on_paid_order_reports_stored_state() {
        let mut paid = order("order_abc", OrderStatus::Success);
        paid.transaction_id = Some("pay_1".to_string());
        let orders = Arc::new(InMemoryOrders::with(vec![paid]));
        let usecase = usecase(Arc::clone(&orders), gateway(), quiet_queue());

        let tampered = sign_hex(KEY_SECRET, b"order_abc|pay_2");
        let response = usecase
            .verify(verify_request(OrderStatus::Success, Some("pay_9"), Some(tampered)))
            .await
            .unwrap();

        assert_eq!(
            response,
            VerifyPaymentResponse {
                success: true,
                status: OrderStatus::Success,
            }
        );
        let stored = orders.get("order_abc").unwrap();
        assert_eq!(stored.status, "SUCCESS");
        assert_eq!(stored.transaction_id.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn success_without_signature_is_not_trusted() {
        let orders = Arc::new(InMemoryOrders::with(vec![order(
            "order_abc",
            OrderStatus::Pending,
        )]));
        let usecase = usecase(Arc::clone(&orders), gateway(), quiet_queue());

        let response = usecase
            .verify(verify_request(OrderStatus::Success, Some("pay_1"), None))
            .await
            .unwrap();

        assert_eq!(response.status, OrderStatus::Failed);
    }

    #[tokio::test]
    async fn stale_pending_after_success_keeps_success() {
        let mut paid = order("order_abc", OrderStatus::Success);
        paid.transaction_id = Some("pay_1".to_string());
        let orders = Arc::new(InMemoryOrders::with(vec![paid]));

        let mut queue = MockNotificationQueue::new();
        queue.expect_enqueue().never();
        let usecase = usecase(Arc::clone(&orders), gateway(), queue);

        let response = usecase
            .verify(verify_request(OrderStatus::Pending, None, None))
            .await
            .unwrap();

        assert_eq!(response.status, OrderStatus::Success);
        assert!(response.success);
        let stored = orders.get("order_abc").unwrap();
        assert_eq!(stored.status, "SUCCESS");
        assert_eq!(stored.transaction_id.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn terminal_statuses_are_sticky() {
        for terminal in OrderStatus::TERMINAL {
            let orders = Arc::new(InMemoryOrders::with(vec![order("order_abc", terminal)]));
            let mut queue = MockNotificationQueue::new();
            queue.expect_enqueue().never();
            let usecase = usecase(Arc::clone(&orders), gateway(), queue);

            let signature = sign_hex(KEY_SECRET, b"order_abc|pay_9");
            for request in [
                verify_request(OrderStatus::Pending, None, None),
                verify_request(OrderStatus::Failed, Some("pay_9"), None),
                verify_request(OrderStatus::Success, Some("pay_9"), Some(signature.clone())),
            ] {
                let response = usecase.verify(request).await.unwrap();
                assert_eq!(response.status, terminal);
            }

            assert_eq!(orders.get("order_abc").unwrap().status, terminal.as_str());
        }
    }

    #[tokio::test]
    async fn verify_unknown_order_is_not_found() {
        let orders = Arc::new(InMemoryOrders::default());
        let usecase = usecase(orders, gateway(), quiet_queue());

        let err = usecase
            .verify(verify_request(OrderStatus::Failed, None, None))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::OrderNotFound));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_order_checks_user_and_event_before_gateway() {
        let orders = Arc::new(InMemoryOrders::default());
        let mut gateway = gateway();
        gateway.expect_create_order().never();
        let usecase = usecase(Arc::clone(&orders), gateway, quiet_queue());

        let err = usecase
            .create_order(CreateOrderRequest {
                amount: 1500,
                user_id: 8,
                event_id: 3,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::UserNotFound));

        let err = usecase
            .create_order(CreateOrderRequest {
                amount: 1500,
                user_id: 7,
                event_id: 4,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::EventNotFound));
    }

    #[tokio::test]
    async fn gateway_failure_leaves_no_local_row() {
        let orders = Arc::new(InMemoryOrders::default());
        let mut gateway = gateway();
        gateway
            .expect_create_order()
            .returning(|_, _, _, _| Err(anyhow::anyhow!("503 from gateway")));
        let usecase = usecase(Arc::clone(&orders), gateway, quiet_queue());

        let err = usecase
            .create_order(CreateOrderRequest {
                amount: 1500,
                user_id: 7,
                event_id: 3,
            })
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Failed to create order");
        assert!(orders.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn webhook_capture_reconciles_to_success() {
        let orders = Arc::new(InMemoryOrders::with(vec![order(
            "order_abc",
            OrderStatus::Pending,
        )]));
        let mut gateway = gateway();
        gateway.expect_verify_webhook_signature().returning(|payload, _| {
            Ok(serde_json::from_slice(payload).unwrap())
        });
        let usecase = usecase(Arc::clone(&orders), gateway, quiet_queue());

        let payload = br#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1","order_id":"order_abc","status":"captured"}}}}"#;
        usecase.handle_webhook(payload, "sig").await.unwrap();

        let stored = orders.get("order_abc").unwrap();
        assert_eq!(stored.status, "SUCCESS");
        assert_eq!(stored.transaction_id.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn webhook_with_bad_signature_is_rejected() {
        let orders = Arc::new(InMemoryOrders::default());
        let mut gateway = gateway();
        gateway
            .expect_verify_webhook_signature()
            .returning(|_, _| Err(anyhow::anyhow!("invalid webhook signature")));
        let usecase = usecase(orders, gateway, quiet_queue());

        let err = usecase.handle_webhook(b"{}", "nope").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidWebhook(_)));
    }

    #[tokio::test]
    async fn refund_only_applies_to_successful_orders() {
        let orders = Arc::new(InMemoryOrders::with(vec![
            order("order_paid", OrderStatus::Success),
            order("order_open", OrderStatus::Pending),
        ]));
        let usecase = usecase(Arc::clone(&orders), gateway(), quiet_queue());

        let refunded = usecase.refund("order_paid").await.unwrap();
        assert_eq!(refunded.status, OrderStatus::Refunded);

        let again = usecase.refund("order_paid").await.unwrap();
        assert_eq!(again.status, OrderStatus::Refunded);

        let err = usecase.refund("order_open").await.unwrap_err();
        assert!(matches!(err, PaymentError::NotRefundable(OrderStatus::Pending)));
        assert_eq!(orders.get("order_open").unwrap().status, "PENDING");
    }
}
