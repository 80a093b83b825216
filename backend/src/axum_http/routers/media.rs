use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use eventhub::{
    domain::value_objects::{
        enums::media_kinds::MediaKind, media_assets::CreateMediaAssetModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::media_assets::MediaAssetPostgres,
    },
};
use tracing::info;

use crate::{
    auth::{AdminUser, AuthUser},
    axum_http::{error_responses::AppError, multipart::MultipartForm},
    usecases::{media::MediaUseCase, uploads::MediaStore},
};

const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct MediaState {
    usecase: Arc<MediaUseCase>,
    kind: MediaKind,
}

/// One router per kind; `/gallery` and `/documents` share the handlers.
pub fn routes(db_pool: Arc<PgPoolSquad>, media: Arc<MediaStore>, kind: MediaKind) -> Router {
    let repository = MediaAssetPostgres::new(Arc::clone(&db_pool));
    let usecase = MediaUseCase::new(Arc::new(repository), media);

    Router::new()
        .route("/", get(list).post(upload))
        .route("/:asset_id", delete(remove))
        .with_state(MediaState {
            usecase: Arc::new(usecase),
            kind,
        })
}

pub async fn list(
    State(state): State<MediaState>,
    auth: Option<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    if state.kind.requires_auth() && auth.is_none() {
        return Err(AppError::Unauthorized(
            "Sign in to view investor documents".to_string(),
        ));
    }

    Ok(Json(state.usecase.list(state.kind).await?))
}

pub async fn upload(
    State(state): State<MediaState>,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = MultipartForm::read(multipart, FILE_FIELD).await?;
    let file = form
        .take_file()
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", FILE_FIELD)))?;
    let title = match form.text("title") {
        Some(title) => title.to_string(),
        None => file.file_name().unwrap_or("untitled").to_string(),
    };

    info!(admin_id = admin.user_id, kind = %state.kind, "media: upload requested");
    let asset = state
        .usecase
        .upload(state.kind, CreateMediaAssetModel { title }, file)
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn remove(
    State(state): State<MediaState>,
    AdminUser(admin): AdminUser,
    Path(asset_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!(admin_id = admin.user_id, kind = %state.kind, asset_id, "media: delete requested");
    state.usecase.delete(state.kind, asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use eventhub::domain::repositories::{
        media_assets::MockMediaAssetRepository, storage::MockObjectStorage,
    };
    use tower::ServiceExt;

    fn app(kind: MediaKind, repo: MockMediaAssetRepository) -> Router {
        let media = Arc::new(MediaStore::new(Arc::new(MockObjectStorage::new()), "media".into()));
        Router::new()
            .route("/", get(list))
            .with_state(MediaState {
                usecase: Arc::new(MediaUseCase::new(Arc::new(repo), media)),
                kind,
            })
    }

    #[tokio::test]
    async fn documents_need_a_session() {
        let mut repo = MockMediaAssetRepository::new();
        repo.expect_list().never();

        let response = app(MediaKind::InvestorDocument, repo)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn gallery_is_public() {
        let mut repo = MockMediaAssetRepository::new();
        repo.expect_list()
            .withf(|kind| *kind == MediaKind::Gallery)
            .returning(|_| Ok(Vec::new()));

        let response = app(MediaKind::Gallery, repo)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
