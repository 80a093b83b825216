use std::sync::Arc;

use anyhow::{Context, Result};
use backend::usecases::pending_reminders::PendingReminderUseCase;
use eventhub::{
    domain::repositories::mailer::MailSender,
    infra::db::{
        postgres::postgres_connection,
        repositories::{events::EventPostgres, orders::OrderPostgres, users::UserPostgres},
    },
    mail::smtp::SmtpMailer,
};
use tracing::{error, info};
use worker::{axum_http, config, services::worker_loop};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = ?err, "worker: exited with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    eventhub::observability::init_observability("worker")?;

    let config = Arc::new(config::config_loader::load().context("failed to load worker configuration")?);
    info!("worker: configuration loaded");

    let db_pool = Arc::new(postgres_connection::establish_connection(&config.database.url)?);
    info!("worker: postgres pool ready");

    let mailer: Arc<dyn MailSender + Send + Sync> = Arc::new(SmtpMailer::new(config.smtp.clone())?);
    let reminders = Arc::new(PendingReminderUseCase::new(
        Arc::new(OrderPostgres::new(Arc::clone(&db_pool))),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(EventPostgres::new(Arc::clone(&db_pool))),
        mailer,
    ));

    let sweep_loop = tokio::spawn(worker_loop::run_pending_sweep_loop(reminders, config.sweep));
    let health_server = tokio::spawn(axum_http::http_serve::start(Arc::clone(&config)));

    tokio::select! {
        result = sweep_loop => result??,
        result = health_server => result??,
    };

    Ok(())
}
