use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::questions::{
    AnswerEntity, InsertAnswerEntity, InsertQuestionEntity, QuestionEntity,
};

#[automock]
#[async_trait]
pub trait QuestionRepository {
    async fn list_questions(&self) -> Result<Vec<QuestionEntity>>;

    async fn list_answers(&self, question_ids: Vec<i64>) -> Result<Vec<AnswerEntity>>;

    async fn find_question(&self, question_id: i64) -> Result<Option<QuestionEntity>>;

    async fn insert_question(&self, question: InsertQuestionEntity) -> Result<QuestionEntity>;

    async fn insert_answer(&self, answer: InsertAnswerEntity) -> Result<AnswerEntity>;

    async fn soft_delete_question(&self, question_id: i64) -> Result<bool>;

    async fn soft_delete_answer(&self, answer_id: i64) -> Result<bool>;
}
