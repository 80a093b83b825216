use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use eventhub::{
    domain::value_objects::events::{CreateEventModel, UpdateEventModel},
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::events::EventPostgres},
};
use tracing::info;

use crate::{
    auth::AdminUser,
    axum_http::{error_responses::AppError, multipart::MultipartForm},
    usecases::{events::EventUseCase, uploads::MediaStore},
};

const IMAGE_FIELD: &str = "image";

pub fn routes(db_pool: Arc<PgPoolSquad>, media: Arc<MediaStore>) -> Router {
    let event_repository = EventPostgres::new(Arc::clone(&db_pool));
    let usecase = EventUseCase::new(Arc::new(event_repository), media);

    Router::new()
        .route("/", get(list).post(create))
        .route("/:event_id", get(get_one).patch(update).delete(remove))
        .with_state(Arc::new(usecase))
}

pub async fn list(State(usecase): State<Arc<EventUseCase>>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(usecase.list().await?))
}

pub async fn get_one(
    State(usecase): State<Arc<EventUseCase>>,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(usecase.get(event_id).await?))
}

pub async fn create(
    State(usecase): State<Arc<EventUseCase>>,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = MultipartForm::read(multipart, IMAGE_FIELD).await?;
    let model = CreateEventModel {
        title: form.required("title")?,
        description: form.required("description")?,
        venue: form.text("venue").map(str::to_string),
        starts_at: form
            .parse::<DateTime<Utc>>("starts_at")?
            .ok_or_else(|| AppError::BadRequest("starts_at is required".to_string()))?,
        price_minor: form.parse::<i64>("price_minor")?.unwrap_or(0),
    };

    info!(admin_id = admin.user_id, "events: create requested");
    let event = usecase.create(model, form.take_file()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update(
    State(usecase): State<Arc<EventUseCase>>,
    AdminUser(admin): AdminUser,
    Path(event_id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = MultipartForm::read(multipart, IMAGE_FIELD).await?;
    let model = UpdateEventModel {
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
        venue: form.text("venue").map(str::to_string),
        starts_at: form.parse::<DateTime<Utc>>("starts_at")?,
        price_minor: form.parse::<i64>("price_minor")?,
    };

    info!(admin_id = admin.user_id, event_id, "events: update requested");
    let event = usecase.update(event_id, model, form.take_file()).await?;
    Ok(Json(event))
}

pub async fn remove(
    State(usecase): State<Arc<EventUseCase>>,
    AdminUser(admin): AdminUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!(admin_id = admin.user_id, event_id, "events: delete requested");
    usecase.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
