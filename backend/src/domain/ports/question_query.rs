//! Driving port for listing questions.

use async_trait::async_trait;

use crate::domain::{Error, Question, QuestionFilter, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionQuery: Send + Sync {
    /// The user's questions matching `filter`, newest first.
    async fn list_questions(
        &self,
        user_id: &UserId,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, Error>;
}
