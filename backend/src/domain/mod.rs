//! Domain primitives, aggregates and services.
//!
//! Purpose: keep the question tracker's rules (topic vivification, revision
//! stamping, sampling bounds, progress counting) independent of HTTP and
//! storage. Adapters talk to the domain only through [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`Question`], [`Topic`], [`User`] and their identifiers.
//! - Services implementing the driving ports.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod progress;
pub mod progress_service;
pub mod question;
pub mod question_filter;
pub mod question_service;
pub mod revision;
pub mod revision_service;
pub mod topic;
pub mod topic_registry_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::error::{Error, ErrorCode};
pub use self::progress::{OverallProgress, TopicStats, overall_progress, per_topic_stats};
pub use self::progress_service::ProgressService;
pub use self::question::{
    Difficulty, NewQuestion, Question, QuestionId, QuestionName, QuestionPatch,
    QuestionValidationError, TopicName,
};
pub use self::question_filter::{
    DEFAULT_STALE_DAYS, ParseRevisionStatusError, QuestionFilter, RevisionStatus,
};
pub use self::question_service::QuestionService;
pub use self::revision::{DEFAULT_SAMPLE_SIZE, SampleSize, ZeroSampleSizeError};
pub use self::revision_service::RevisionService;
pub use self::topic::{Topic, TopicId};
pub use self::topic_registry_service::TopicRegistryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, USERNAME_MIN, User, UserId, UserValidationError, Username};
