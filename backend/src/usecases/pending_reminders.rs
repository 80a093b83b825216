use std::sync::Arc;

use chrono::{Duration, Utc};
use eventhub::{
    domain::{
        entities::orders::OrderEntity,
        repositories::{
            events::EventRepository, mailer::MailSender, orders::OrderRepository,
            users::UserRepository,
        },
        value_objects::{enums::order_statuses::OrderStatus, orders::PendingCheckResponse},
    },
    mail::templates::render_payment_mail,
};
use tracing::{error, info, warn};

use super::{
    notifications::load_mail_context,
    payments::{PaymentError, UseCaseResult},
};

pub const PENDING_MAIL_SENT: &str = "Pending mail sent";
pub const PENDING_MAIL_ALREADY_SENT: &str = "Pending mail already sent";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What happens to a claimed marker when the reminder cannot be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnSendFailure {
    /// Clear it, the caller retries on demand.
    Release,
    /// Mark it failed so later sweeps move past the order.
    Park,
}

/// Sends the "payment pending" reminder at most once per order.
pub struct PendingReminderUseCase {
    order_repo: Arc<dyn OrderRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    event_repo: Arc<dyn EventRepository + Send + Sync>,
    mailer: Arc<dyn MailSender + Send + Sync>,
}

impl PendingReminderUseCase {
    pub fn new(
        order_repo: Arc<dyn OrderRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        event_repo: Arc<dyn EventRepository + Send + Sync>,
        mailer: Arc<dyn MailSender + Send + Sync>,
    ) -> Self {
        Self {
            order_repo,
            user_repo,
            event_repo,
            mailer,
        }
    }

    pub async fn check(&self, order_id: &str) -> UseCaseResult<PendingCheckResponse> {
        self.remind(order_id, OnSendFailure::Release).await
    }

    async fn remind(
        &self,
        order_id: &str,
        on_failure: OnSendFailure,
    ) -> UseCaseResult<PendingCheckResponse> {
        let order = self
            .order_repo
            .find_by_order_id(order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)?;

        let status = order.status()?;
        if status.is_terminal() {
            info!(%order_id, %status, "pending_reminders: order finalized, no mail");
            return Ok(finalized(status));
        }

        if order.pending_mail_sent() {
            return Ok(already_sent());
        }

        if !self.order_repo.claim_pending_mail(order_id).await? {
            // Lost the race to another caller, or the order was finalized meanwhile.
            return match self.order_repo.find_by_order_id(order_id).await? {
                Some(current) => {
                    let status = current.status()?;
                    Ok(if status.is_terminal() {
                        finalized(status)
                    } else {
                        already_sent()
                    })
                }
                None => Err(PaymentError::OrderNotFound),
            };
        }

        if let Err(err) = self.send_reminder(&order).await {
            let reset = match on_failure {
                OnSendFailure::Release => self.order_repo.release_pending_mail(order_id).await,
                OnSendFailure::Park => self.order_repo.park_pending_mail(order_id).await,
            };
            if let Err(db_err) = reset {
                error!(
                    %order_id,
                    ?on_failure,
                    db_error = ?db_err,
                    "pending_reminders: failed to reset mail marker"
                );
            }
            return Err(err);
        }

        info!(%order_id, "pending_reminders: reminder sent");
        Ok(PendingCheckResponse {
            success: true,
            status: OrderStatus::Pending,
            message: PENDING_MAIL_SENT.to_string(),
        })
    }

    /// Reminds every order that has been `PENDING` for longer than `older_than`.
    /// Orders whose reminder fails are parked, so they do not hold up the next batch.
    pub async fn sweep_stale(&self, older_than: Duration, limit: i64) -> UseCaseResult<SweepReport> {
        let created_before = Utc::now() - older_than;
        let stale = self
            .order_repo
            .list_stale_pending(created_before, limit)
            .await?;

        let mut report = SweepReport {
            examined: stale.len(),
            ..SweepReport::default()
        };

        for order in stale {
            match self.remind(&order.order_id, OnSendFailure::Park).await {
                Ok(response) if response.message == PENDING_MAIL_SENT => report.sent += 1,
                Ok(_) => report.skipped += 1,
                Err(err) => {
                    warn!(
                        order_id = %order.order_id,
                        error = %err,
                        "pending_reminders: reminder failed during sweep"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.examined > 0 {
            info!(
                examined = report.examined,
                sent = report.sent,
                skipped = report.skipped,
                failed = report.failed,
                "pending_reminders: sweep finished"
            );
        }

        Ok(report)
    }

    async fn send_reminder(&self, order: &OrderEntity) -> UseCaseResult<()> {
        let context =
            load_mail_context(self.user_repo.as_ref(), self.event_repo.as_ref(), order)
                .await?
                .ok_or_else(|| {
                    warn!(
                        order_id = %order.order_id,
                        "pending_reminders: user or event missing"
                    );
                    PaymentError::Internal(anyhow::anyhow!(
                        "user or event for order {} not found",
                        order.order_id
                    ))
                })?;

        let mail = render_payment_mail(OrderStatus::Pending, &context);
        self.mailer.send(mail).await.map_err(|err| {
            error!(
                order_id = %order.order_id,
                error = ?err,
                "pending_reminders: send failed"
            );
            PaymentError::Mail(err)
        })
    }
}

fn finalized(status: OrderStatus) -> PendingCheckResponse {
    PendingCheckResponse {
        success: true,
        status,
        message: format!("Order already {}", status),
    }
}

fn already_sent() -> PendingCheckResponse {
    PendingCheckResponse {
        success: true,
        status: OrderStatus::Pending,
        message: PENDING_MAIL_ALREADY_SENT.to_string(),
    }
}
