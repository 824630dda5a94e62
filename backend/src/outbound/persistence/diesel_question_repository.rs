//! PostgreSQL-backed `QuestionRepository`.
//!
//! Every statement filters on `user_id` as well as `id`, so another user's
//! question is indistinguishable from a missing one. Sampling is done by the
//! database with `ORDER BY random() LIMIT n`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{QuestionRepository, QuestionRepositoryError};
use crate::domain::{Difficulty, Question, QuestionId, QuestionName, TopicName, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewQuestionRow, QuestionChangeset, QuestionRow};
use super::pool::{DbPool, PoolError};
use super::schema::questions;

diesel::define_sql_function!(fn random() -> Double);

#[derive(Clone)]
pub struct DieselQuestionRepository {
    pool: DbPool,
}

impl DieselQuestionRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> QuestionRepositoryError {
    map_basic_pool_error(error, QuestionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> QuestionRepositoryError {
    map_basic_diesel_error(
        error,
        QuestionRepositoryError::query,
        QuestionRepositoryError::connection,
    )
}

fn corrupt_row(id: uuid::Uuid, err: impl std::fmt::Display) -> QuestionRepositoryError {
    QuestionRepositoryError::query(format!("invalid question row {id}: {err}"))
}

fn row_to_question(row: QuestionRow) -> Result<Question, QuestionRepositoryError> {
    let name = QuestionName::new(&row.name).map_err(|err| corrupt_row(row.id, err))?;
    let topic = TopicName::new(&row.topic).map_err(|err| corrupt_row(row.id, err))?;
    let difficulty = row
        .difficulty
        .parse::<Difficulty>()
        .map_err(|err| corrupt_row(row.id, err))?;

    Ok(Question {
        id: QuestionId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        name,
        topic,
        difficulty,
        code: row.code,
        notes: row.notes,
        link: row.link,
        is_revised: row.is_revised,
        last_revised_date: row.last_revised_date,
        created_at: row.created_at,
    })
}

fn rows_to_questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, QuestionRepositoryError> {
    rows.into_iter().map(row_to_question).collect()
}

#[async_trait]
impl QuestionRepository for DieselQuestionRepository {
    async fn insert(&self, question: &Question) -> Result<(), QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewQuestionRow {
            id: *question.id.as_uuid(),
            user_id: *question.user_id.as_uuid(),
            name: question.name.as_ref(),
            topic: question.topic.as_ref(),
            difficulty: question.difficulty.as_str(),
            code: &question.code,
            notes: &question.notes,
            link: &question.link,
            is_revised: question.is_revised,
            last_revised_date: question.last_revised_date,
            created_at: question.created_at,
        };

        diesel::insert_into(questions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: &QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        questions::table
            .filter(questions::id.eq(id.as_uuid()))
            .filter(questions::user_id.eq(user_id.as_uuid()))
            .select(QuestionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_question)
            .transpose()
    }

    async fn update(&self, question: &Question) -> Result<bool, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = QuestionChangeset {
            name: question.name.as_ref(),
            topic: question.topic.as_ref(),
            difficulty: question.difficulty.as_str(),
            code: &question.code,
            notes: &question.notes,
            link: &question.link,
            is_revised: question.is_revised,
            last_revised_date: question.last_revised_date,
        };

        let updated = diesel::update(
            questions::table
                .filter(questions::id.eq(question.id.as_uuid()))
                .filter(questions::user_id.eq(question.user_id.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: &QuestionId,
    ) -> Result<bool, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            questions::table
                .filter(questions::id.eq(id.as_uuid()))
                .filter(questions::user_id.eq(user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<QuestionRow> = questions::table
            .filter(questions::user_id.eq(user_id.as_uuid()))
            .order((questions::created_at.desc(), questions::id.desc()))
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_questions(rows)
    }

    async fn sample_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| QuestionRepositoryError::query(format!("sample limit {limit} too large")))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<QuestionRow> = questions::table
            .filter(questions::user_id.eq(user_id.as_uuid()))
            .order(random())
            .limit(limit)
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_questions(rows)
    }
}
