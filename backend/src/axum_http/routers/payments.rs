use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use eventhub::{
    domain::{
        repositories::mailer::MailSender,
        value_objects::orders::{
            CreateOrderRequest, OrderListQuery, PendingCheckRequest, RefundRequest,
            SendEmailRequest, SuccessResponse, VerifyPaymentRequest,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{events::EventPostgres, orders::OrderPostgres, users::UserPostgres},
    },
};
use tracing::info;

use crate::{
    auth::{AdminUser, AuthUser},
    axum_http::validated_json::ValidatedJson,
    usecases::{
        notifications::{NotificationQueue, NotificationUseCase},
        payments::{PaymentError, PaymentGateway, PaymentUseCase},
        pending_reminders::PendingReminderUseCase,
    },
};

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[derive(Clone)]
pub struct PaymentsState {
    pub payments: Arc<PaymentUseCase>,
    pub reminders: Arc<PendingReminderUseCase>,
    pub mail: Arc<NotificationUseCase>,
}

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn MailSender + Send + Sync>,
    notifications: Arc<dyn NotificationQueue>,
    currency: String,
) -> Router {
    let order_repository = Arc::new(OrderPostgres::new(Arc::clone(&db_pool)));
    let user_repository = Arc::new(UserPostgres::new(Arc::clone(&db_pool)));
    let event_repository = Arc::new(EventPostgres::new(Arc::clone(&db_pool)));

    let payments = PaymentUseCase::new(
        order_repository.clone(),
        user_repository.clone(),
        event_repository.clone(),
        gateway,
        notifications,
        currency.clone(),
    );
    let reminders = PendingReminderUseCase::new(
        order_repository,
        user_repository.clone(),
        event_repository,
        Arc::clone(&mailer),
    );
    let mail = NotificationUseCase::new(user_repository.clone(), mailer, currency);

    router(PaymentsState {
        payments: Arc::new(payments),
        reminders: Arc::new(reminders),
        mail: Arc::new(mail),
    })
}

pub fn router(state: PaymentsState) -> Router {
    Router::new()
        .route("/create-order", post(create_order))
        .route("/verify", post(verify))
        .route("/send-email", post(send_email))
        .route("/pending-check", post(pending_check))
        .route("/webhook", post(webhook))
        .route("/refund", post(refund))
        .route("/orders", get(list_orders))
        .route("/orders/me", get(list_my_orders))
        .with_state(state)
}

pub async fn create_order(
    State(state): State<PaymentsState>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, PaymentError> {
    let response = state.payments.create_order(request).await?;
    Ok(Json(response))
}

pub async fn verify(
    State(state): State<PaymentsState>,
    ValidatedJson(request): ValidatedJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, PaymentError> {
    let response = state.payments.verify(request).await?;
    Ok(Json(response))
}

pub async fn send_email(
    State(state): State<PaymentsState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> Result<impl IntoResponse, PaymentError> {
    state.mail.send_now(auth.caller(), request).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn pending_check(
    State(state): State<PaymentsState>,
    ValidatedJson(request): ValidatedJson<PendingCheckRequest>,
) -> Result<impl IntoResponse, PaymentError> {
    let response = state.reminders.check(request.order_id.trim()).await?;
    Ok(Json(response))
}

pub async fn webhook(
    State(state): State<PaymentsState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| PaymentError::InvalidWebhook("missing signature header".to_string()))?;

    state.payments.handle_webhook(&body, signature).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn refund(
    State(state): State<PaymentsState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(request): ValidatedJson<RefundRequest>,
) -> Result<impl IntoResponse, PaymentError> {
    info!(admin_id = admin.user_id, order_id = %request.order_id, "payments: refund requested");
    let order = state.payments.refund(request.order_id.trim()).await?;
    Ok(Json(order))
}

pub async fn list_orders(
    State(state): State<PaymentsState>,
    _admin: AdminUser,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, PaymentError> {
    let orders = state.payments.list(query.status).await?;
    Ok(Json(orders))
}

pub async fn list_my_orders(
    State(state): State<PaymentsState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, PaymentError> {
    let orders = state.payments.list_for_user(auth.user_id).await?;
    Ok(Json(orders))
}
