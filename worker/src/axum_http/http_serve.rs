use crate::{axum_http::default_routers, config::config_model::DotEnvyConfig};
use anyhow::Result;
use axum::{Router, http::StatusCode, routing::get};
use backend::axum_http::http_serve::shutdown_signal;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub fn router(config: &DotEnvyConfig) -> Router {
    Router::new()
        .fallback(default_routers::not_found)
        .route("/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.worker_server.timeout),
        ))
        .layer(TraceLayer::new_for_http())
}

pub async fn start(config: Arc<DotEnvyConfig>) -> Result<()> {
    let app = router(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.worker_server.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Worker HTTP server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_model::{PendingSweep, WorkerServer};
    use axum::{body::Body, http::Request};
    use backend::config::config_model::Database;
    use eventhub::mail::smtp::{SmtpConfig, SmtpTls};
    use tower::ServiceExt;

    fn config() -> DotEnvyConfig {
        DotEnvyConfig {
            worker_server: WorkerServer {
                port: 0,
                timeout: 5,
            },
            database: Database {
                url: "postgres://localhost/eventhub".to_string(),
            },
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 1025,
                username: None,
                password: None,
                from: "EventHub <noreply@example.com>".to_string(),
                tls: SmtpTls::None,
            },
            sweep: PendingSweep::default(),
        }
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        let response = router(&config())
            .oneshot(Request::builder().uri("/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = router(&config())
            .oneshot(Request::builder().uri("/internal/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
