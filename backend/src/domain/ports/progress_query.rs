//! Driving port for revision progress.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{Error, OverallProgress, TopicStats, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressQuery: Send + Sync {
    async fn overall_progress(&self, user_id: &UserId) -> Result<OverallProgress, Error>;

    /// Counts keyed by the topic string stored on each question.
    async fn per_topic_stats(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<String, TopicStats>, Error>;
}
