use std::{collections::HashMap, sync::Arc};

use eventhub::domain::{
    entities::questions::{InsertAnswerEntity, InsertQuestionEntity},
    repositories::{events::EventRepository, questions::QuestionRepository},
    value_objects::questions::{
        AnswerDto, AnswerQuestionRequest, AskQuestionRequest, QuestionDto,
    },
};
use tracing::{info, warn};
use validator::Validate;

use super::content::{Caller, ContentError, ContentResult};

pub struct QuestionUseCase {
    questions: Arc<dyn QuestionRepository + Send + Sync>,
    events: Arc<dyn EventRepository + Send + Sync>,
}

impl QuestionUseCase {
    pub fn new(
        questions: Arc<dyn QuestionRepository + Send + Sync>,
        events: Arc<dyn EventRepository + Send + Sync>,
    ) -> Self {
        Self { questions, events }
    }

    /// Questions newest first, each with its answers in posting order.
    pub async fn list(&self) -> ContentResult<Vec<QuestionDto>> {
        let questions = self.questions.list_questions().await?;
        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let ids = questions.iter().map(|question| question.id).collect();
        let mut answers_by_question: HashMap<i64, Vec<AnswerDto>> = HashMap::new();
        for answer in self.questions.list_answers(ids).await? {
            answers_by_question
                .entry(answer.question_id)
                .or_default()
                .push(AnswerDto::from(answer));
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let answers = answers_by_question.remove(&question.id).unwrap_or_default();
                QuestionDto::new(question, answers)
            })
            .collect())
    }

    pub async fn ask(&self, user_id: i64, request: AskQuestionRequest) -> ContentResult<QuestionDto> {
        request.validate()?;

        if let Some(event_id) = request.event_id {
            if self.events.find_by_id(event_id).await?.is_none() {
                return Err(ContentError::NotFound("event"));
            }
        }

        let question = self
            .questions
            .insert_question(InsertQuestionEntity {
                user_id,
                event_id: request.event_id,
                body: request.body.trim().to_string(),
            })
            .await?;

        info!(question_id = question.id, user_id, "questions: asked");
        Ok(QuestionDto::new(question, Vec::new()))
    }

    pub async fn answer(
        &self,
        question_id: i64,
        admin_id: i64,
        request: AnswerQuestionRequest,
    ) -> ContentResult<AnswerDto> {
        request.validate()?;

        if self.questions.find_question(question_id).await?.is_none() {
            return Err(ContentError::NotFound("question"));
        }

        let answer = self
            .questions
            .insert_answer(InsertAnswerEntity {
                question_id,
                user_id: admin_id,
                body: request.body.trim().to_string(),
            })
            .await?;

        info!(question_id, answer_id = answer.id, "questions: answered");
        Ok(AnswerDto::from(answer))
    }

    pub async fn delete_question(&self, question_id: i64, caller: Caller) -> ContentResult<()> {
        let question = self
            .questions
            .find_question(question_id)
            .await?
            .ok_or(ContentError::NotFound("question"))?;

        if !caller.may_modify(question.user_id) {
            warn!(question_id, user_id = caller.user_id, "questions: delete forbidden");
            return Err(ContentError::Forbidden("delete this question"));
        }

        if !self.questions.soft_delete_question(question_id).await? {
            return Err(ContentError::NotFound("question"));
        }

        info!(question_id, "questions: deleted");
        Ok(())
    }

    pub async fn delete_answer(&self, answer_id: i64) -> ContentResult<()> {
        if !self.questions.soft_delete_answer(answer_id).await? {
            return Err(ContentError::NotFound("answer"));
        }

        info!(answer_id, "questions: answer deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eventhub::domain::{
        entities::questions::{AnswerEntity, QuestionEntity},
        repositories::{events::MockEventRepository, questions::MockQuestionRepository},
    };

    fn question(id: i64, user_id: i64) -> QuestionEntity {
        QuestionEntity {
            id,
            user_id,
            event_id: None,
            body: "Is parking available?".to_string(),
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    fn answer(id: i64, question_id: i64) -> AnswerEntity {
        AnswerEntity {
            id,
            question_id,
            user_id: 1,
            body: "Yes".to_string(),
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn groups_answers_under_their_questions() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_list_questions()
            .returning(|| Ok(vec![question(2, 7), question(1, 8)]));
        repo.expect_list_answers()
            .withf(|ids| ids == &vec![2, 1])
            .returning(|_| Ok(vec![answer(10, 1), answer(11, 2), answer(12, 1)]));
        let usecase = QuestionUseCase::new(Arc::new(repo), Arc::new(MockEventRepository::new()));

        let listed = usecase.list().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 2);
        assert_eq!(listed[0].answers.len(), 1);
        assert_eq!(
            listed[1].answers.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![10, 12]
        );
    }

    #[tokio::test]
    async fn asking_about_unknown_event_is_not_found() {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|_| Ok(None));
        let mut repo = MockQuestionRepository::new();
        repo.expect_insert_question().never();
        let usecase = QuestionUseCase::new(Arc::new(repo), Arc::new(events));

        let err = usecase
            .ask(
                7,
                AskQuestionRequest {
                    body: "When does it start?".to_string(),
                    event_id: Some(42),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound("event")));
    }

    #[tokio::test]
    async fn strangers_cannot_delete_questions() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_find_question().returning(|id| Ok(Some(question(id, 7))));
        repo.expect_soft_delete_question().never();
        let usecase = QuestionUseCase::new(Arc::new(repo), Arc::new(MockEventRepository::new()));

        let err = usecase
            .delete_question(
                1,
                Caller {
                    user_id: 8,
                    is_admin: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Forbidden(_)));
    }

    #[tokio::test]
    async fn answering_deleted_question_is_not_found() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_find_question().returning(|_| Ok(None));
        let usecase = QuestionUseCase::new(Arc::new(repo), Arc::new(MockEventRepository::new()));

        let err = usecase
            .answer(
                1,
                1,
                AnswerQuestionRequest {
                    body: "Yes".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound("question")));
    }
}
