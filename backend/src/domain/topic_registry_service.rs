//! Topic registry service.
//!
//! Implements [`TopicRegistry`] over a [`TopicRepository`]. Creation is
//! look-up-then-insert; a duplicate reported by the adapter means another
//! request won the race, so the winner's record is read back instead of
//! surfacing the collision.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{TopicRegistry, TopicRepository, TopicRepositoryError};
use crate::domain::{Error, Topic, TopicName, UserId};

pub(crate) fn map_topic_error(error: TopicRepositoryError) -> Error {
    match error {
        TopicRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("topic repository unavailable: {message}"))
        }
        TopicRepositoryError::Query { message } => {
            Error::internal(format!("topic repository error: {message}"))
        }
        TopicRepositoryError::DuplicateName { name } => {
            Error::internal(format!("unresolved topic collision: {name}"))
        }
    }
}

#[derive(Clone)]
pub struct TopicRegistryService<R> {
    topic_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TopicRegistryService<R> {
    /// Register topics in `topic_repo`.
    pub fn new(topic_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { topic_repo, clock }
    }
}

impl<R> TopicRegistryService<R>
where
    R: TopicRepository,
{
    async fn find(&self, user_id: &UserId, name: &TopicName) -> Result<Option<Topic>, Error> {
        self.topic_repo
            .find_by_name(user_id, name)
            .await
            .map_err(map_topic_error)
    }
}

#[async_trait]
impl<R> TopicRegistry for TopicRegistryService<R>
where
    R: TopicRepository,
{
    async fn ensure_topic(&self, user_id: &UserId, name: &TopicName) -> Result<Topic, Error> {
        if let Some(existing) = self.find(user_id, name).await? {
            return Ok(existing);
        }

        let topic = Topic::new(*user_id, name.clone(), self.clock.utc());
        match self.topic_repo.insert(&topic).await {
            Ok(()) => {
                info!(user_id = %user_id, topic = %name, "topic registered");
                Ok(topic)
            }
            Err(TopicRepositoryError::DuplicateName { .. }) => {
                debug!(user_id = %user_id, topic = %name, "topic created concurrently; re-reading");
                self.find(user_id, name).await?.ok_or_else(|| {
                    Error::internal(format!("topic {name} missing after duplicate insert"))
                })
            }
            Err(err) => Err(map_topic_error(err)),
        }
    }

    async fn list_topics(&self, user_id: &UserId) -> Result<Vec<Topic>, Error> {
        self.topic_repo
            .list_for_user(user_id)
            .await
            .map_err(map_topic_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTopicRepository;
    use crate::test_support::FixtureClock;
    use rstest::rstest;

    fn service(repo: MockTopicRepository) -> TopicRegistryService<MockTopicRepository> {
        TopicRegistryService::new(Arc::new(repo), FixtureClock::shared())
    }

    fn graphs() -> TopicName {
        TopicName::new("Graphs").expect("topic name")
    }

    #[tokio::test]
    async fn existing_topic_is_returned_without_insert() {
        let user_id = UserId::random();
        let existing = Topic::new(user_id, graphs(), Default::default());
        let expected = existing.clone();
        let mut repo = MockTopicRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(move |_, _| Ok(Some(existing)));
        repo.expect_insert().never();

        let topic = service(repo)
            .ensure_topic(&user_id, &graphs())
            .await
            .expect("ensure succeeds");
        assert_eq!(topic, expected);
    }

    #[tokio::test]
    async fn missing_topic_is_inserted_with_clock_time() {
        let user_id = UserId::random();
        let mut repo = MockTopicRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(|_, _| Ok(None));
        repo.expect_insert().times(1).return_once(|_| Ok(()));

        let topic = service(repo)
            .ensure_topic(&user_id, &graphs())
            .await
            .expect("ensure succeeds");
        assert_eq!(topic.user_id, user_id);
        assert_eq!(topic.name, graphs());
        assert_eq!(topic.created_at, crate::test_support::fixture_timestamp());
    }

    #[tokio::test]
    async fn duplicate_insert_re_reads_winner() {
        let user_id = UserId::random();
        let winner = Topic::new(user_id, graphs(), Default::default());
        let expected = winner.clone();
        let mut seq = mockall::Sequence::new();
        let mut repo = MockTopicRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Err(TopicRepositoryError::duplicate_name("Graphs")));
        repo.expect_find_by_name()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_, _| Ok(Some(winner)));

        let topic = service(repo)
            .ensure_topic(&user_id, &graphs())
            .await
            .expect("race resolves to the stored topic");
        assert_eq!(topic.id, expected.id);
    }

    #[rstest]
    #[case::connection(TopicRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case::query(TopicRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: TopicRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockTopicRepository::new();
        repo.expect_list_for_user()
            .times(1)
            .return_once(move |_| Err(failure));

        let err = service(repo)
            .list_topics(&UserId::random())
            .await
            .expect_err("failure propagates");
        assert_eq!(err.code(), expected);
    }
}
