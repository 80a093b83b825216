use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::questions::{AnswerEntity, QuestionEntity};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AskQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerQuestionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnswerDto {
    pub id: i64,
    pub user_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<AnswerEntity> for AnswerDto {
    fn from(value: AnswerEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            body: value.body,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionDto {
    pub id: i64,
    pub user_id: i64,
    pub event_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<AnswerDto>,
}

impl QuestionDto {
    pub fn new(question: QuestionEntity, answers: Vec<AnswerDto>) -> Self {
        Self {
            id: question.id,
            user_id: question.user_id,
            event_id: question.event_id,
            body: question.body,
            created_at: question.created_at,
            answers,
        }
    }
}
