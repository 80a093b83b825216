use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use eventhub::{
    domain::value_objects::questions::{AnswerQuestionRequest, AskQuestionRequest},
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{events::EventPostgres, questions::QuestionPostgres},
    },
};

use crate::{
    auth::{AdminUser, AuthUser},
    axum_http::{error_responses::AppError, validated_json::ValidatedJson},
    usecases::questions::QuestionUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let question_repository = QuestionPostgres::new(Arc::clone(&db_pool));
    let event_repository = EventPostgres::new(Arc::clone(&db_pool));
    let usecase = QuestionUseCase::new(Arc::new(question_repository), Arc::new(event_repository));

    Router::new()
        .route("/", get(list).post(ask))
        .route("/:question_id", delete(delete_question))
        .route("/:question_id/answers", post(answer))
        .route("/answers/:answer_id", delete(delete_answer))
        .with_state(Arc::new(usecase))
}

pub async fn list(
    State(usecase): State<Arc<QuestionUseCase>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(usecase.list().await?))
}

pub async fn ask(
    State(usecase): State<Arc<QuestionUseCase>>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<AskQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = usecase.ask(auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn answer(
    State(usecase): State<Arc<QuestionUseCase>>,
    AdminUser(admin): AdminUser,
    Path(question_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<AnswerQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let answer = usecase.answer(question_id, admin.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

pub async fn delete_question(
    State(usecase): State<Arc<QuestionUseCase>>,
    auth: AuthUser,
    Path(question_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    usecase.delete_question(question_id, auth.caller()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_answer(
    State(usecase): State<Arc<QuestionUseCase>>,
    _admin: AdminUser,
    Path(answer_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    usecase.delete_answer(answer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
