//! Practice question aggregate and its revision state machine.
//!
//! A [`Question`] is owned by exactly one user. Its topic is a denormalised
//! string: renaming or deleting questions never touches the topic registry.
//!
//! Revision invariants enforced here rather than in adapters:
//! - a question that is not revised never carries a `last_revised_date`;
//! - turning `is_revised` on without an explicit date stamps "now".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Validation errors raised while building question inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    EmptyName,
    EmptyTopic,
    UnknownDifficulty { input: String },
    InvalidId,
}

impl fmt::Display for QuestionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyTopic => write!(f, "topic must not be empty"),
            Self::UnknownDifficulty { input } => {
                write!(f, "difficulty must be one of Easy, Medium, Hard (got {input:?})")
            }
            Self::InvalidId => write!(f, "question id must be a valid UUID"),
        }
    }
}

impl std::error::Error for QuestionValidationError {}

/// Stable question identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Parse an id from its hyphenated text form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, QuestionValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| QuestionValidationError::InvalidId)
    }

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

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question difficulty, serialised exactly as `Easy`, `Medium` or `Hard`.
///
/// # Examples
/// ```
/// use revision_tracker::domain::Difficulty;
///
/// assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
/// assert!("medium".parse::<Difficulty>().is_err());
/// assert_eq!(Difficulty::Hard.as_str(), "Hard");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Wire spelling of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = QuestionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Hard" => Ok(Self::Hard),
            _ => Err(QuestionValidationError::UnknownDifficulty {
                input: s.to_owned(),
            }),
        }
    }
}

macro_rules! trimmed_text {
    ($(#[$meta:meta])* $name:ident, $empty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trim `raw` and reject it when nothing is left.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, QuestionValidationError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(QuestionValidationError::$empty);
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = QuestionValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

trimmed_text!(
    /// Question title, trimmed and non-empty.
    QuestionName,
    EmptyName
);

trimmed_text!(
    /// Topic label, trimmed and non-empty. Case is preserved as entered.
    ///
    /// ```
    /// use revision_tracker::domain::TopicName;
    ///
    /// assert_eq!(TopicName::new("  Graphs ").unwrap().as_ref(), "Graphs");
    /// assert!(TopicName::new(" \t").is_err());
    /// ```
    TopicName,
    EmptyTopic
);

/// A practice question as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub user_id: UserId,
    pub name: QuestionName,
    pub topic: TopicName,
    pub difficulty: Difficulty,
    pub code: String,
    pub notes: String,
    pub link: String,
    pub is_revised: bool,
    pub last_revised_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a question.
///
/// Free-text fields default to empty; the link is trimmed.
///
/// # Examples
/// ```
/// use revision_tracker::domain::{Difficulty, NewQuestion, QuestionName, TopicName};
///
/// let draft = NewQuestion::new(
///     QuestionName::new("Two Sum").unwrap(),
///     TopicName::new("Arrays").unwrap(),
///     Difficulty::Easy,
/// )
/// .with_link("  https://leetcode.com/problems/two-sum  ");
/// assert_eq!(draft.link, "https://leetcode.com/problems/two-sum");
/// assert!(!draft.is_revised);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub name: QuestionName,
    pub topic: TopicName,
    pub difficulty: Difficulty,
    pub code: String,
    pub notes: String,
    pub link: String,
    pub is_revised: bool,
    pub last_revised_date: Option<DateTime<Utc>>,
}

impl NewQuestion {
    /// Draft with no code, notes or link.
    pub fn new(name: QuestionName, topic: TopicName, difficulty: Difficulty) -> Self {
        Self {
            name,
            topic,
            difficulty,
            code: String::new(),
            notes: String::new(),
            link: String::new(),
            is_revised: false,
            last_revised_date: None,
        }
    }

    /// Attach a code snippet.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Attach free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Attach a reference link, trimmed.
    pub fn with_link(mut self, link: impl AsRef<str>) -> Self {
        self.link = link.as_ref().trim().to_owned();
        self
    }

    /// Override the initial revision state.
    pub fn with_revision(mut self, is_revised: bool, date: Option<DateTime<Utc>>) -> Self {
        self.is_revised = is_revised;
        self.last_revised_date = date;
        self
    }
}

/// Field-level update. `None` leaves the stored value untouched.
///
/// `last_revised_date` is doubly optional: `Some(None)` is an explicit null,
/// which differs from leaving the field out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub name: Option<QuestionName>,
    pub topic: Option<TopicName>,
    pub difficulty: Option<Difficulty>,
    pub code: Option<String>,
    pub notes: Option<String>,
    pub link: Option<String>,
    pub is_revised: Option<bool>,
    pub last_revised_date: Option<Option<DateTime<Utc>>>,
}

impl Question {
    /// Materialise a new question owned by `user_id`.
    pub fn create(id: QuestionId, user_id: UserId, input: NewQuestion, now: DateTime<Utc>) -> Self {
        let last_revised_date = if input.is_revised {
            Some(input.last_revised_date.unwrap_or(now))
        } else {
            None
        };

        Self {
            id,
            user_id,
            name: input.name,
            topic: input.topic,
            difficulty: input.difficulty,
            code: input.code,
            notes: input.notes,
            link: input.link.trim().to_owned(),
            is_revised: input.is_revised,
            last_revised_date,
            created_at: now,
        }
    }

    /// Merge `patch` into this question.
    ///
    /// Revision rules:
    /// - `is_revised: false` clears the date, whatever date was supplied;
    /// - `is_revised: true` uses the supplied date, or "now" when the question
    ///   was not revised before, the stored date is missing, or the date was an
    ///   explicit null;
    /// - a date without `is_revised` only applies to an already revised
    ///   question.
    pub fn apply(&mut self, patch: QuestionPatch, now: DateTime<Utc>) {
        let QuestionPatch {
            name,
            topic,
            difficulty,
            code,
            notes,
            link,
            is_revised,
            last_revised_date,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(topic) = topic {
            self.topic = topic;
        }
        if let Some(difficulty) = difficulty {
            self.difficulty = difficulty;
        }
        if let Some(code) = code {
            self.code = code;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        if let Some(link) = link {
            self.link = link.trim().to_owned();
        }

        self.apply_revision(is_revised, last_revised_date, now);
    }

    fn apply_revision(
        &mut self,
        is_revised: Option<bool>,
        date: Option<Option<DateTime<Utc>>>,
        now: DateTime<Utc>,
    ) {
        let revised = is_revised.unwrap_or(self.is_revised);
        if !revised {
            self.is_revised = false;
            self.last_revised_date = None;
            return;
        }

        let toggled_on = !self.is_revised;
        let explicit_null = is_revised == Some(true) && date == Some(None);
        self.last_revised_date = match (date.flatten(), self.last_revised_date) {
            (Some(supplied), _) => Some(supplied),
            (None, Some(existing)) if !toggled_on && !explicit_null => Some(existing),
            _ => Some(now),
        };
        self.is_revised = true;
    }
}
