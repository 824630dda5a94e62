//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{questions, topics, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = topics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TopicRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = topics)]
pub(crate) struct NewTopicRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub topic: String,
    pub difficulty: String,
    pub code: String,
    pub notes: String,
    pub link: String,
    pub is_revised: bool,
    pub last_revised_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
pub(crate) struct NewQuestionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub topic: &'a str,
    pub difficulty: &'a str,
    pub code: &'a str,
    pub notes: &'a str,
    pub link: &'a str,
    pub is_revised: bool,
    pub last_revised_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Full replacement of the mutable columns.
///
/// `treat_none_as_null` so clearing a revision writes `NULL` instead of
/// skipping the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = questions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct QuestionChangeset<'a> {
    pub name: &'a str,
    pub topic: &'a str,
    pub difficulty: &'a str,
    pub code: &'a str,
    pub notes: &'a str,
    pub link: &'a str,
    pub is_revised: bool,
    pub last_revised_date: Option<DateTime<Utc>>,
}
