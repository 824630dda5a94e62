//! Driven port for question persistence.
//!
//! Every operation is scoped by owner. A question id that belongs to another
//! user must behave exactly like an id that does not exist.

use async_trait::async_trait;

use crate::domain::{Question, QuestionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by question repository adapters.
    pub enum QuestionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "question repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "question repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert(&self, question: &Question) -> Result<(), QuestionRepositoryError>;

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: &QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError>;

    /// Overwrite the stored row matching `(question.user_id, question.id)`.
    ///
    /// Returns `false` when no such row exists. Concurrent writers resolve
    /// last-write-wins.
    async fn update(&self, question: &Question) -> Result<bool, QuestionRepositoryError>;

    /// Delete by owner and id, returning whether a row was removed.
    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: &QuestionId,
    ) -> Result<bool, QuestionRepositoryError>;

    /// All questions owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<Question>, QuestionRepositoryError>;

    /// Uniform random sample of at most `limit` questions without
    /// replacement. Order is unspecified.
    async fn sample_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Question>, QuestionRepositoryError>;
}
