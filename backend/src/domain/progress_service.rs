//! Progress aggregator service.
//!
//! Scans the user's questions on demand; nothing is cached between calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ProgressQuery, QuestionRepository};
use crate::domain::question_service::map_question_error;
use crate::domain::{
    Error, OverallProgress, Question, TopicStats, UserId, overall_progress, per_topic_stats,
};

#[derive(Clone)]
pub struct ProgressService<Q> {
    question_repo: Arc<Q>,
}

impl<Q> ProgressService<Q> {
    /// Aggregate progress over `question_repo`.
    pub fn new(question_repo: Arc<Q>) -> Self {
        Self { question_repo }
    }
}

impl<Q> ProgressService<Q>
where
    Q: QuestionRepository,
{
    async fn questions(&self, user_id: &UserId) -> Result<Vec<Question>, Error> {
        self.question_repo
            .list_for_user(user_id)
            .await
            .map_err(map_question_error)
    }
}

#[async_trait]
impl<Q> ProgressQuery for ProgressService<Q>
where
    Q: QuestionRepository,
{
    async fn overall_progress(&self, user_id: &UserId) -> Result<OverallProgress, Error> {
        Ok(overall_progress(&self.questions(user_id).await?))
    }

    async fn per_topic_stats(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<String, TopicStats>, Error> {
        Ok(per_topic_stats(&self.questions(user_id).await?))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockQuestionRepository;
    use crate::domain::{Difficulty, NewQuestion, QuestionId, QuestionName, TopicName};
    use chrono::Utc;

    fn question(user_id: UserId, topic: &str, revised: bool) -> Question {
        let draft = NewQuestion::new(
            QuestionName::new("q").expect("name"),
            TopicName::new(topic).expect("topic"),
            Difficulty::Hard,
        )
        .with_revision(revised, None);
        Question::create(QuestionId::random(), user_id, draft, Utc::now())
    }

    fn service_with(rows: Vec<Question>) -> ProgressService<MockQuestionRepository> {
        let mut repo = MockQuestionRepository::new();
        repo.expect_list_for_user()
            .times(1)
            .return_once(move |_| Ok(rows));
        ProgressService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn per_topic_stats_groups_raw_topic_strings() {
        let user_id = UserId::random();
        let rows = vec![
            question(user_id, "Arrays", true),
            question(user_id, "Arrays", false),
            question(user_id, "Trees", true),
        ];

        let stats = service_with(rows)
            .per_topic_stats(&user_id)
            .await
            .expect("stats succeed");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["Arrays"], TopicStats { total: 2, revised: 1 });
        assert_eq!(stats["Trees"], TopicStats { total: 1, revised: 1 });
    }

    #[tokio::test]
    async fn overall_progress_counts_user_questions() {
        let user_id = UserId::random();
        let rows = vec![question(user_id, "Arrays", true), question(user_id, "DP", false)];

        let progress = service_with(rows)
            .overall_progress(&user_id)
            .await
            .expect("progress succeeds");
        assert_eq!(
            progress,
            OverallProgress {
                revised_count: 1,
                total_count: 2
            }
        );
    }
}
