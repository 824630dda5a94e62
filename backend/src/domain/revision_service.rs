//! Revision selector service: random revision sets drawn by the storage
//! adapter's native sampler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{QuestionRepository, RevisionSelector};
use crate::domain::question_service::map_question_error;
use crate::domain::{Error, Question, SampleSize, UserId};

#[derive(Clone)]
pub struct RevisionService<Q> {
    question_repo: Arc<Q>,
}

impl<Q> RevisionService<Q> {
    /// Draw revision sets from `question_repo`.
    pub fn new(question_repo: Arc<Q>) -> Self {
        Self { question_repo }
    }
}

#[async_trait]
impl<Q> RevisionSelector for RevisionService<Q>
where
    Q: QuestionRepository,
{
    async fn sample(&self, user_id: &UserId, size: SampleSize) -> Result<Vec<Question>, Error> {
        let questions = self
            .question_repo
            .sample_for_user(user_id, size.get())
            .await
            .map_err(map_question_error)?;
        debug!(
            user_id = %user_id,
            requested = size.get(),
            drawn = questions.len(),
            "revision set drawn"
        );
        Ok(questions)
    }
}
