//! Topic registry records.
//!
//! A [`Topic`] is a cache of the topic names a user has used, not a parent
//! of questions. Records are created on first use and never deleted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TopicName, UserId};

/// Stable topic identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(Uuid);

impl TopicId {
    /// Fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A known topic name for one user. `(user_id, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub user_id: UserId,
    pub name: TopicName,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    /// New topic with a fresh id.
    pub fn new(user_id: UserId, name: TopicName, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TopicId::random(),
            user_id,
            name,
            created_at,
        }
    }
}
