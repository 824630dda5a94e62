//! Driven port for topic registry persistence.
//!
//! Adapters must enforce uniqueness of `(user_id, name)` themselves (a
//! database constraint or a single lock) and report a collision as
//! [`TopicRepositoryError::DuplicateName`] rather than overwriting.

use async_trait::async_trait;

use crate::domain::{Topic, TopicName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by topic repository adapters.
    pub enum TopicRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "topic repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "topic repository query failed: {message}",
        /// A topic with the same name already exists for the user.
        DuplicateName { name: String } =>
            "topic already exists: {name}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Look up a topic by exact name for one user.
    async fn find_by_name(
        &self,
        user_id: &UserId,
        name: &TopicName,
    ) -> Result<Option<Topic>, TopicRepositoryError>;

    /// Insert a new topic, failing with `DuplicateName` if the pair exists.
    async fn insert(&self, topic: &Topic) -> Result<(), TopicRepositoryError>;

    /// All topics owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Topic>, TopicRepositoryError>;
}
