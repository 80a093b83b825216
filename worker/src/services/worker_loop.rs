use std::{sync::Arc, time::Duration};

use anyhow::Result;
use backend::usecases::pending_reminders::{PendingReminderUseCase, SweepReport};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::config::config_model::PendingSweep;

/// Runs the stale-pending sweep forever, one pass per interval. A failed pass is logged
/// and the loop carries on.
pub async fn run_pending_sweep_loop(
    usecase: Arc<PendingReminderUseCase>,
    config: PendingSweep,
) -> Result<()> {
    info!(
        interval_secs = config.interval_secs,
        remind_after_secs = config.remind_after_secs,
        batch_size = config.batch_size,
        "worker: pending sweep loop started"
    );

    let mut ticker = interval(Duration::from_secs(config.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let _ = sweep_once(&usecase, config).await;
    }
}

pub async fn sweep_once(
    usecase: &PendingReminderUseCase,
    config: PendingSweep,
) -> Option<SweepReport> {
    let older_than = chrono::Duration::seconds(config.remind_after_secs);

    match usecase.sweep_stale(older_than, config.batch_size).await {
        Ok(report) => {
            if report.examined == 0 {
                debug!("worker: no stale pending orders");
            }
            Some(report)
        }
        Err(err) => {
            error!(error = %err, "worker: pending sweep failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventhub::domain::{
        entities::{events::EventEntity, orders::OrderEntity, users::UserEntity},
        repositories::{
            events::MockEventRepository, mailer::MockMailSender, orders::MockOrderRepository,
            users::MockUserRepository,
        },
        value_objects::enums::order_statuses::OrderStatus,
    };

    fn stale_order() -> OrderEntity {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        OrderEntity {
            id: 1,
            order_id: "order_stale".to_string(),
            transaction_id: None,
            user_id: 7,
            event_id: 3,
            amount_minor: 1500,
            currency: "INR".to_string(),
            status: OrderStatus::Pending.as_str().to_string(),
            mail_status: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            Ok(Some(UserEntity {
                id,
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                role: "user".to_string(),
                created_at: Utc::now(),
            }))
        });
        users
    }

    fn events() -> MockEventRepository {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|id| {
            let now = Utc::now();
            Ok(Some(EventEntity {
                id,
                title: "Founders Meetup".to_string(),
                description: "Evening of talks".to_string(),
                venue: None,
                starts_at: now,
                price_minor: 1500,
                image_url: None,
                image_key: None,
                created_at: now,
                updated_at: now,
            }))
        });
        events
    }

    #[tokio::test]
    async fn sweep_reminds_stale_orders_once() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_stale_pending()
            .withf(|_, limit| *limit == 100)
            .returning(|_, _| Ok(vec![stale_order()]));
        orders
            .expect_find_by_order_id()
            .returning(|_| Ok(Some(stale_order())));
        orders
            .expect_claim_pending_mail()
            .times(1)
            .returning(|_| Ok(true));

        let mut mailer = MockMailSender::new();
        mailer
            .expect_send()
            .withf(|mail| mail.to_email == "asha@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let usecase = PendingReminderUseCase::new(
            Arc::new(orders),
            Arc::new(users()),
            Arc::new(events()),
            Arc::new(mailer),
        );

        let report = sweep_once(&usecase, PendingSweep::default()).await.unwrap();

        assert_eq!(report.examined, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn failed_listing_is_swallowed() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_stale_pending()
            .returning(|_, _| Err(anyhow::anyhow!("connection reset")));

        let usecase = PendingReminderUseCase::new(
            Arc::new(orders),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockEventRepository::new()),
            Arc::new(MockMailSender::new()),
        );

        assert!(sweep_once(&usecase, PendingSweep::default()).await.is_none());
    }
}
