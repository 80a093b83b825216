use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::{answers, questions};

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = questions)]
pub struct QuestionEntity {
    pub id: i64,
    pub user_id: i64,
    pub event_id: Option<i64>,
    pub body: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
pub struct InsertQuestionEntity {
    pub user_id: i64,
    pub event_id: Option<i64>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = answers)]
pub struct AnswerEntity {
    pub id: i64,
    pub question_id: i64,
    pub user_id: i64,
    pub body: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = answers)]
pub struct InsertAnswerEntity {
    pub question_id: i64,
    pub user_id: i64,
    pub body: String,
}
