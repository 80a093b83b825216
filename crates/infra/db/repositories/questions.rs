use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{answers, questions},
    },
};
use domain::{
    entities::questions::{
        AnswerEntity, InsertAnswerEntity, InsertQuestionEntity, QuestionEntity,
    },
    repositories::questions::QuestionRepository,
};

pub struct QuestionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl QuestionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl QuestionRepository for QuestionPostgres {
    async fn list_questions(&self) -> Result<Vec<QuestionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = questions::table
            .filter(questions::is_deleted.eq(false))
            .order(questions::created_at.desc())
            .select(QuestionEntity::as_select())
            .load::<QuestionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_answers(&self, question_ids: Vec<i64>) -> Result<Vec<AnswerEntity>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = answers::table
            .filter(answers::question_id.eq_any(question_ids))
            .filter(answers::is_deleted.eq(false))
            .order(answers::created_at.asc())
            .select(AnswerEntity::as_select())
            .load::<AnswerEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_question(&self, question_id: i64) -> Result<Option<QuestionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let question = questions::table
            .filter(questions::id.eq(question_id))
            .filter(questions::is_deleted.eq(false))
            .select(QuestionEntity::as_select())
            .first::<QuestionEntity>(&mut conn)
            .optional()?;

        Ok(question)
    }

    async fn insert_question(&self, question: InsertQuestionEntity) -> Result<QuestionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(questions::table)
            .values(&question)
            .returning(QuestionEntity::as_returning())
            .get_result::<QuestionEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn insert_answer(&self, answer: InsertAnswerEntity) -> Result<AnswerEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(answers::table)
            .values(&answer)
            .returning(AnswerEntity::as_returning())
            .get_result::<AnswerEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn soft_delete_question(&self, question_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(questions::table)
            .filter(questions::id.eq(question_id))
            .filter(questions::is_deleted.eq(false))
            .set(questions::is_deleted.eq(true))
            .execute(&mut conn)?;

        Ok(affected == 1)
    }

    async fn soft_delete_answer(&self, answer_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(answers::table)
            .filter(answers::id.eq(answer_id))
            .filter(answers::is_deleted.eq(false))
            .set(answers::is_deleted.eq(true))
            .execute(&mut conn)?;

        Ok(affected == 1)
    }
}
