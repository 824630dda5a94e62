//! In-memory adapter for every driven repository port.
//!
//! Backs the server when no database is configured and drives the
//! integration tests. All tables sit behind one `tokio::sync::RwLock`, so a
//! check-and-insert runs under a single write guard and concurrent
//! `ensure_topic` calls cannot both insert.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::{IteratorRandom, SliceRandom};
use tokio::sync::RwLock;

use crate::domain::ports::{
    QuestionRepository, QuestionRepositoryError, TopicRepository, TopicRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{Question, QuestionId, Topic, TopicName, User, UserId, Username};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Both vectors keep insertion order, which is creation order.
    topics: Vec<Topic>,
    questions: Vec<Question>,
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(UserRepositoryError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }
}

#[async_trait]
impl TopicRepository for MemoryStore {
    async fn find_by_name(
        &self,
        user_id: &UserId,
        name: &TopicName,
    ) -> Result<Option<Topic>, TopicRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .topics
            .iter()
            .find(|topic| &topic.user_id == user_id && &topic.name == name)
            .cloned())
    }

    async fn insert(&self, topic: &Topic) -> Result<(), TopicRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .topics
            .iter()
            .any(|existing| existing.user_id == topic.user_id && existing.name == topic.name)
        {
            return Err(TopicRepositoryError::duplicate_name(topic.name.as_ref()));
        }
        tables.topics.push(topic.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Topic>, TopicRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .topics
            .iter()
            .rev()
            .filter(|topic| &topic.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn insert(&self, question: &Question) -> Result<(), QuestionRepositoryError> {
        self.tables.write().await.questions.push(question.clone());
        Ok(())
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: &QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .find(|question| &question.id == id && &question.user_id == user_id)
            .cloned())
    }

    async fn update(&self, question: &Question) -> Result<bool, QuestionRepositoryError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .questions
            .iter_mut()
            .find(|stored| stored.id == question.id && stored.user_id == question.user_id);
        Ok(match slot {
            Some(stored) => {
                *stored = question.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: &QuestionId,
    ) -> Result<bool, QuestionRepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.questions.len();
        tables
            .questions
            .retain(|question| !(&question.id == id && &question.user_id == user_id));
        Ok(tables.questions.len() < before)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .rev()
            .filter(|question| &question.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn sample_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let tables = self.tables.read().await;
        let mut rng = SmallRng::from_entropy();
        // Reservoir sampling keeps the source order; shuffle so callers do
        // not see creation order.
        let mut sample: Vec<Question> = tables
            .questions
            .iter()
            .filter(|question| &question.user_id == user_id)
            .cloned()
            .choose_multiple(&mut rng, limit);
        sample.shuffle(&mut rng);
        Ok(sample)
    }
}
