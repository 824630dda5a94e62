//! Driving port for drawing random revision sets.

use async_trait::async_trait;

use crate::domain::{Error, Question, SampleSize, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevisionSelector: Send + Sync {
    /// Draw up to `size` distinct questions uniformly at random.
    ///
    /// When the user owns fewer questions than requested, all of them are
    /// returned. The result is never padded.
    async fn sample(&self, user_id: &UserId, size: SampleSize) -> Result<Vec<Question>, Error>;
}
