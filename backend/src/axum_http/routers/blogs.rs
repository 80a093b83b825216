use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use eventhub::{
    domain::value_objects::blogs::{CreateBlogModel, CreateCommentRequest, UpdateBlogModel},
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{blogs::BlogPostgres, comments::CommentPostgres},
    },
};
use tracing::info;

use crate::{
    auth::{AdminUser, AuthUser},
    axum_http::{
        error_responses::AppError, multipart::MultipartForm, validated_json::ValidatedJson,
    },
    usecases::{blogs::BlogUseCase, uploads::MediaStore},
};

const COVER_FIELD: &str = "cover";

pub fn routes(db_pool: Arc<PgPoolSquad>, media: Arc<MediaStore>) -> Router {
    let blog_repository = BlogPostgres::new(Arc::clone(&db_pool));
    let comment_repository = CommentPostgres::new(Arc::clone(&db_pool));
    let usecase = BlogUseCase::new(
        Arc::new(blog_repository),
        Arc::new(comment_repository),
        media,
    );

    Router::new()
        .route("/", get(list).post(create))
        .route("/:blog_id", get(get_one).patch(update).delete(remove))
        .route("/:blog_id/comments", get(list_comments).post(add_comment))
        .route("/:blog_id/comments/:comment_id", delete(delete_comment))
        .with_state(Arc::new(usecase))
}

fn sees_drafts(auth: &Option<AuthUser>) -> bool {
    auth.as_ref().is_some_and(AuthUser::is_admin)
}

pub async fn list(
    State(usecase): State<Arc<BlogUseCase>>,
    auth: Option<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(usecase.list(sees_drafts(&auth)).await?))
}

pub async fn get_one(
    State(usecase): State<Arc<BlogUseCase>>,
    auth: Option<AuthUser>,
    Path(blog_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(usecase.get(blog_id, sees_drafts(&auth)).await?))
}

pub async fn create(
    State(usecase): State<Arc<BlogUseCase>>,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = MultipartForm::read(multipart, COVER_FIELD).await?;
    let model = CreateBlogModel {
        title: form.required("title")?,
        content: form.required("content")?,
        published: form.flag("published").unwrap_or(false),
    };

    info!(admin_id = admin.user_id, "blogs: create requested");
    let blog = usecase.create(admin.user_id, model, form.take_file()).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

pub async fn update(
    State(usecase): State<Arc<BlogUseCase>>,
    AdminUser(admin): AdminUser,
    Path(blog_id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = MultipartForm::read(multipart, COVER_FIELD).await?;
    let model = UpdateBlogModel {
        title: form.text("title").map(str::to_string),
        content: form.text("content").map(str::to_string),
        published: form.flag("published"),
    };

    info!(admin_id = admin.user_id, blog_id, "blogs: update requested");
    let blog = usecase.update(blog_id, model, form.take_file()).await?;
    Ok(Json(blog))
}

pub async fn remove(
    State(usecase): State<Arc<BlogUseCase>>,
    AdminUser(admin): AdminUser,
    Path(blog_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!(admin_id = admin.user_id, blog_id, "blogs: delete requested");
    usecase.delete(blog_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments(
    State(usecase): State<Arc<BlogUseCase>>,
    Path(blog_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(usecase.list_comments(blog_id).await?))
}

pub async fn add_comment(
    State(usecase): State<Arc<BlogUseCase>>,
    auth: AuthUser,
    Path(blog_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = usecase.add_comment(blog_id, auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(usecase): State<Arc<BlogUseCase>>,
    auth: AuthUser,
    Path((_blog_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    usecase.delete_comment(comment_id, auth.caller()).await?;
    Ok(StatusCode::NO_CONTENT)
}
