use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::{
        notifications::{NotificationDispatcher, RetryPolicy},
        uploads::MediaStore,
    },
};
use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use eventhub::{
    domain::{repositories::mailer::MailSender, value_objects::enums::media_kinds::MediaKind},
    infra::{db::postgres::postgres_connection::PgPoolSquad, storages::minio::MinioStorageClient},
    mail::smtp::SmtpMailer,
    payments::razorpay_client::RazorpayClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let storage = MinioStorageClient::new(config.object_storage.minio.clone()).await?;
    let media = Arc::new(MediaStore::new(
        Arc::new(storage),
        config.object_storage.bucket.clone(),
    ));

    let mailer: Arc<dyn MailSender + Send + Sync> =
        Arc::new(SmtpMailer::new(config.smtp.clone())?);
    let notifications = NotificationDispatcher::spawn(Arc::clone(&mailer), RetryPolicy::default());

    let razorpay = RazorpayClient::new(
        config.razorpay.key_id.clone(),
        config.razorpay.key_secret.clone(),
        config.razorpay.webhook_secret.clone(),
        config.razorpay.api_base.clone(),
    );

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/payments",
            routers::payments::routes(
                Arc::clone(&db_pool),
                Arc::new(razorpay),
                mailer,
                Arc::new(notifications),
                config.razorpay.currency.clone(),
            ),
        )
        .nest(
            "/api/v1/events",
            routers::events::routes(Arc::clone(&db_pool), Arc::clone(&media)),
        )
        .nest(
            "/api/v1/blogs",
            routers::blogs::routes(Arc::clone(&db_pool), Arc::clone(&media)),
        )
        .nest(
            "/api/v1/gallery",
            routers::media::routes(Arc::clone(&db_pool), Arc::clone(&media), MediaKind::Gallery),
        )
        .nest(
            "/api/v1/documents",
            routers::media::routes(
                Arc::clone(&db_pool),
                Arc::clone(&media),
                MediaKind::InvestorDocument,
            ),
        )
        .nest("/api/v1/questions", routers::questions::routes(Arc::clone(&db_pool)))
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.backend_server.timeout),
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
