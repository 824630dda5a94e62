//! Driving port for question mutations.
//!
//! Inbound adapters call this port with already-validated domain inputs. A
//! question owned by another user is reported as not found.

use async_trait::async_trait;

use crate::domain::{Error, NewQuestion, Question, QuestionId, QuestionPatch, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionCommand: Send + Sync {
    /// Persist a new question, registering its topic if needed.
    async fn create(&self, user_id: &UserId, input: NewQuestion) -> Result<Question, Error>;

    /// Merge `patch` into an existing question.
    async fn update(
        &self,
        user_id: &UserId,
        id: &QuestionId,
        patch: QuestionPatch,
    ) -> Result<Question, Error>;

    /// Remove a question. Deleting twice fails the second time.
    async fn delete(&self, user_id: &UserId, id: &QuestionId) -> Result<(), Error>;
}
