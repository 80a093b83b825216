use std::{sync::Arc, time::Duration};

use anyhow::Result;
use eventhub::{
    domain::{
        entities::{events::EventEntity, orders::OrderEntity, users::UserEntity},
        repositories::{events::EventRepository, mailer::MailSender, users::UserRepository},
        value_objects::{enums::order_statuses::OrderStatus, orders::SendEmailRequest},
    },
    mail::templates::{PaymentMailContext, render_payment_mail},
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::{
    content::Caller,
    payments::{PaymentError, UseCaseResult},
};

/// A status mail waiting to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEmail {
    pub status: OrderStatus,
    pub context: PaymentMailContext,
}

#[cfg_attr(test, mockall::automock)]
pub trait NotificationQueue: Send + Sync {
    /// Never blocks and never fails the caller; drops the mail with a warning instead.
    fn enqueue(&self, email: PaymentEmail);
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<PaymentEmail>,
}

impl NotificationDispatcher {
    /// Spawns the delivery task on the current runtime.
    pub fn spawn(mailer: Arc<dyn MailSender + Send + Sync>, policy: RetryPolicy) -> Self {
        let (tx, mut rx) = mpsc::channel::<PaymentEmail>(256);

        tokio::spawn(async move {
            while let Some(email) = rx.recv().await {
                let _ = deliver_with_retry(mailer.as_ref(), &email, policy).await;
            }
        });

        Self { tx }
    }
}

impl NotificationQueue for NotificationDispatcher {
    fn enqueue(&self, email: PaymentEmail) {
        let order_id = email.context.order_id.clone();
        match self.tx.try_send(email) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%order_id, "notifications: queue full; dropping mail");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%order_id, "notifications: queue closed; dropping mail");
            }
        }
    }
}

/// Sends one mail, retrying with exponential backoff. Returns the last error once the
/// attempts are used up.
pub async fn deliver_with_retry(
    mailer: &(dyn MailSender + Send + Sync),
    email: &PaymentEmail,
    policy: RetryPolicy,
) -> Result<()> {
    let mail = render_payment_mail(email.status, &email.context);
    let order_id = &email.context.order_id;
    let mut backoff = policy.initial_backoff;
    let mut attempt = 1;

    loop {
        match mailer.send(mail.clone()).await {
            Ok(()) => {
                info!(%order_id, status = %email.status, attempt, "notifications: mail sent");
                return Ok(());
            }
            Err(err) if attempt < policy.max_attempts => {
                warn!(
                    %order_id,
                    status = %email.status,
                    attempt,
                    error = %err,
                    "notifications: send failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => {
                error!(
                    %order_id,
                    status = %email.status,
                    attempt,
                    error = ?err,
                    "notifications: giving up on mail"
                );
                return Err(err);
            }
        }
    }
}

pub fn mail_context(
    order: &OrderEntity,
    user: &UserEntity,
    event: &EventEntity,
) -> PaymentMailContext {
    PaymentMailContext {
        to_email: user.email.clone(),
        to_name: user.name.clone(),
        event_title: event.title.clone(),
        amount_minor: order.amount_minor,
        currency: order.currency.clone(),
        order_id: order.order_id.clone(),
        transaction_id: order.transaction_id.clone(),
    }
}

/// Looks up the user and event an order refers to. `None` when either row is gone.
pub async fn load_mail_context(
    user_repo: &(dyn UserRepository + Send + Sync),
    event_repo: &(dyn EventRepository + Send + Sync),
    order: &OrderEntity,
) -> Result<Option<PaymentMailContext>> {
    let Some(user) = user_repo.find_by_id(order.user_id).await? else {
        return Ok(None);
    };
    let Some(event) = event_repo.find_by_id(order.event_id).await? else {
        return Ok(None);
    };

    Ok(Some(mail_context(order, &user, &event)))
}

/// Immediate delivery for the `send-email` endpoint.
pub struct NotificationUseCase {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    mailer: Arc<dyn MailSender + Send + Sync>,
    currency: String,
}

impl NotificationUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        mailer: Arc<dyn MailSender + Send + Sync>,
        currency: String,
    ) -> Self {
        Self {
            user_repo,
            mailer,
            currency,
        }
    }

    /// Users may only mail their own address; admins may mail anyone.
    pub async fn send_now(&self, caller: Caller, request: SendEmailRequest) -> UseCaseResult<()> {
        if !caller.is_admin {
            let user = self
                .user_repo
                .find_by_id(caller.user_id)
                .await?
                .ok_or(PaymentError::UserNotFound)?;
            if !user.email.trim().eq_ignore_ascii_case(request.email.trim()) {
                warn!(
                    user_id = caller.user_id,
                    "notifications: refused mail to an address the caller does not own"
                );
                return Err(PaymentError::Forbidden("send mail to another address"));
            }
        }

        let context = PaymentMailContext {
            to_email: request.email,
            to_name: request.name,
            event_title: request.event_title,
            amount_minor: request.amount,
            currency: self.currency.clone(),
            order_id: request.order_id,
            transaction_id: request.transaction_id,
        };

        info!(
            order_id = %context.order_id,
            status = %request.payment_status,
            "notifications: sending mail on request"
        );

        let mail = render_payment_mail(request.payment_status, &context);
        self.mailer.send(mail).await.map_err(|err| {
            error!(
                order_id = %context.order_id,
                error = ?err,
                "notifications: failed to send requested mail"
            );
            PaymentError::Mail(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::user;
    use eventhub::domain::repositories::{mailer::MockMailSender, users::MockUserRepository};

    fn email() -> PaymentEmail {
        PaymentEmail {
            status: OrderStatus::Success,
            context: PaymentMailContext {
                to_email: "asha@example.com".to_string(),
                to_name: "Asha".to_string(),
                event_title: "Founders Meetup".to_string(),
                amount_minor: 1500,
                currency: "INR".to_string(),
                order_id: "order_abc".to_string(),
                transaction_id: Some("pay_1".to_string()),
            },
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn retries_until_the_mail_goes_through() {
        let mut mailer = MockMailSender::new();
        let mut seq = mockall::Sequence::new();
        mailer
            .expect_send()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("relay busy")));
        mailer
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        deliver_with_retry(&mailer, &email(), fast_policy())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mut mailer = MockMailSender::new();
        mailer
            .expect_send()
            .times(3)
            .returning(|_| Err(anyhow::anyhow!("relay down")));

        let result = deliver_with_retry(&mailer, &email(), fast_policy()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dispatcher_delivers_queued_mail() {
        let (delivered_tx, mut delivered_rx) = mpsc::unbounded_channel();
        let mut mailer = MockMailSender::new();
        mailer.expect_send().times(1).returning(move |mail| {
            let _ = delivered_tx.send(mail.subject);
            Ok(())
        });

        let dispatcher = NotificationDispatcher::spawn(Arc::new(mailer), fast_policy());
        dispatcher.enqueue(email());

        let subject = tokio::time::timeout(Duration::from_secs(2), delivered_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(subject.contains("Founders Meetup"));
    }

    fn send_request(email: &str) -> SendEmailRequest {
        SendEmailRequest {
            email: email.to_string(),
            name: "Asha".to_string(),
            event_title: "Founders Meetup".to_string(),
            amount: 1500,
            order_id: "order_abc".to_string(),
            transaction_id: None,
            payment_status: OrderStatus::Pending,
        }
    }

    fn users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        users
    }

    const MEMBER: Caller = Caller {
        user_id: 7,
        is_admin: false,
    };

    #[tokio::test]
    async fn send_now_uses_configured_currency() {
        let mut mailer = MockMailSender::new();
        mailer
            .expect_send()
            .withf(|mail| {
                mail.to_email.eq_ignore_ascii_case("asha@example.com")
                    && mail.html_body.contains("INR 15.00")
            })
            .times(1)
            .returning(|_| Ok(()));

        let usecase = NotificationUseCase::new(Arc::new(users()), Arc::new(mailer), "INR".to_string());
        usecase
            .send_now(MEMBER, send_request("Asha@Example.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_now_refuses_foreign_address() {
        let mut mailer = MockMailSender::new();
        mailer.expect_send().never();

        let usecase = NotificationUseCase::new(Arc::new(users()), Arc::new(mailer), "INR".to_string());
        let err = usecase
            .send_now(MEMBER, send_request("victim@example.org"))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Forbidden(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_may_mail_any_address() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let mut mailer = MockMailSender::new();
        mailer
            .expect_send()
            .withf(|mail| mail.to_email == "guest@example.org")
            .times(1)
            .returning(|_| Ok(()));

        let usecase = NotificationUseCase::new(Arc::new(users), Arc::new(mailer), "INR".to_string());
        let admin = Caller {
            user_id: 1,
            is_admin: true,
        };
        usecase
            .send_now(admin, send_request("guest@example.org"))
            .await
            .unwrap();
    }
}
