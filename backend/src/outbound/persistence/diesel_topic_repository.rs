//! PostgreSQL-backed `TopicRepository`.
//!
//! Inserts use `ON CONFLICT (user_id, name) DO NOTHING`, so a racing insert
//! never raises a constraint error. Zero affected rows means another writer
//! got there first and is reported as `DuplicateName`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{TopicRepository, TopicRepositoryError};
use crate::domain::{Topic, TopicId, TopicName, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTopicRow, TopicRow};
use super::pool::{DbPool, PoolError};
use super::schema::topics;

#[derive(Clone)]
pub struct DieselTopicRepository {
    pool: DbPool,
}

impl DieselTopicRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TopicRepositoryError {
    map_basic_pool_error(error, TopicRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TopicRepositoryError {
    map_basic_diesel_error(
        error,
        TopicRepositoryError::query,
        TopicRepositoryError::connection,
    )
}

fn row_to_topic(row: TopicRow) -> Result<Topic, TopicRepositoryError> {
    let name = TopicName::new(&row.name).map_err(|err| {
        TopicRepositoryError::query(format!("invalid topic name stored for {}: {err}", row.id))
    })?;
    Ok(Topic {
        id: TopicId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        name,
        created_at: row.created_at,
    })
}

#[async_trait]
impl TopicRepository for DieselTopicRepository {
    async fn find_by_name(
        &self,
        user_id: &UserId,
        name: &TopicName,
    ) -> Result<Option<Topic>, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        topics::table
            .filter(topics::user_id.eq(user_id.as_uuid()))
            .filter(topics::name.eq(name.as_ref()))
            .select(TopicRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_topic)
            .transpose()
    }

    async fn insert(&self, topic: &Topic) -> Result<(), TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTopicRow {
            id: *topic.id.as_uuid(),
            user_id: *topic.user_id.as_uuid(),
            name: topic.name.as_ref(),
            created_at: topic.created_at,
        };

        let inserted = diesel::insert_into(topics::table)
            .values(&row)
            .on_conflict((topics::user_id, topics::name))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if inserted == 0 {
            debug!(user_id = %topic.user_id, topic = %topic.name, "topic insert lost a race");
            return Err(TopicRepositoryError::duplicate_name(topic.name.as_ref()));
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Topic>, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TopicRow> = topics::table
            .filter(topics::user_id.eq(user_id.as_uuid()))
            .order((topics::created_at.desc(), topics::id.desc()))
            .select(TopicRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_topic).collect()
    }
}
