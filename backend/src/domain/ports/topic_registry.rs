//! Driving port for the topic registry.

use async_trait::async_trait;

use crate::domain::{Error, Topic, TopicName, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRegistry: Send + Sync {
    /// Return the topic named `name` for the user, creating it on first use.
    ///
    /// Concurrent calls for the same pair converge on a single record.
    async fn ensure_topic(&self, user_id: &UserId, name: &TopicName) -> Result<Topic, Error>;

    /// Topics known for the user, newest first.
    async fn list_topics(&self, user_id: &UserId) -> Result<Vec<Topic>, Error>;
}
