//! Question store service.
//!
//! Implements [`QuestionCommand`] and [`QuestionQuery`]. Topic vivification
//! is delegated to a [`TopicRegistry`] before any question write that
//! introduces a topic name, so the registry always knows every name in use.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    QuestionCommand, QuestionQuery, QuestionRepository, QuestionRepositoryError, TopicRegistry,
};
use crate::domain::{
    Error, NewQuestion, Question, QuestionFilter, QuestionId, QuestionPatch, UserId,
};

pub(crate) fn map_question_error(error: QuestionRepositoryError) -> Error {
    match error {
        QuestionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("question repository unavailable: {message}"))
        }
        QuestionRepositoryError::Query { message } => {
            Error::internal(format!("question repository error: {message}"))
        }
    }
}

fn question_not_found(id: &QuestionId) -> Error {
    Error::not_found(format!("question {id} not found"))
}

pub struct QuestionService<Q, T: ?Sized> {
    question_repo: Arc<Q>,
    topics: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<Q, T: ?Sized> QuestionService<Q, T> {
    /// Store questions in `question_repo`, registering topics through `topics`.
    pub fn new(question_repo: Arc<Q>, topics: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            question_repo,
            topics,
            clock,
        }
    }
}

impl<Q, T> QuestionService<Q, T>
where
    Q: QuestionRepository,
    T: TopicRegistry + ?Sized,
{
    async fn find_owned(&self, user_id: &UserId, id: &QuestionId) -> Result<Question, Error> {
        self.question_repo
            .find_for_user(user_id, id)
            .await
            .map_err(map_question_error)?
            .ok_or_else(|| question_not_found(id))
    }
}

#[async_trait]
impl<Q, T> QuestionCommand for QuestionService<Q, T>
where
    Q: QuestionRepository,
    T: TopicRegistry + ?Sized,
{
    async fn create(&self, user_id: &UserId, input: NewQuestion) -> Result<Question, Error> {
        self.topics.ensure_topic(user_id, &input.topic).await?;

        let question = Question::create(QuestionId::random(), *user_id, input, self.clock.utc());
        self.question_repo
            .insert(&question)
            .await
            .map_err(map_question_error)?;

        info!(
            user_id = %user_id,
            question_id = %question.id,
            topic = %question.topic,
            "question created"
        );
        Ok(question)
    }

    async fn update(
        &self,
        user_id: &UserId,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<Question, Error> {
        let mut question = self.find_owned(user_id, id).await?;

        if let Some(topic) = patch.topic.as_ref().filter(|topic| **topic != question.topic) {
            self.topics.ensure_topic(user_id, topic).await?;
        }

        question.apply(patch, self.clock.utc());
        let updated = self
            .question_repo
            .update(&question)
            .await
            .map_err(map_question_error)?;
        if !updated {
            // Deleted between the read and the write.
            return Err(question_not_found(id));
        }

        info!(user_id = %user_id, question_id = %id, "question updated");
        Ok(question)
    }

    async fn delete(&self, user_id: &UserId, id: &QuestionId) -> Result<(), Error> {
        let removed = self
            .question_repo
            .delete_for_user(user_id, id)
            .await
            .map_err(map_question_error)?;
        if !removed {
            return Err(question_not_found(id));
        }

        info!(user_id = %user_id, question_id = %id, "question deleted");
        Ok(())
    }
}

#[async_trait]
impl<Q, T> QuestionQuery for QuestionService<Q, T>
where
    Q: QuestionRepository,
    T: TopicRegistry + ?Sized,
{
    async fn list_questions(
        &self,
        user_id: &UserId,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, Error> {
        let mut questions = self
            .question_repo
            .list_for_user(user_id)
            .await
            .map_err(map_question_error)?;

        let now = self.clock.utc();
        questions.retain(|question| filter.matches(question, now));
        Ok(questions)
    }
}

#[cfg(test)]
#[path = "question_service_tests.rs"]
mod tests;
