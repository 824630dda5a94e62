//! PostgreSQL persistence adapters.
//!
//! Repositories are thin translators between Diesel rows (`models`) and
//! domain types, backed by a `bb8` pool through `diesel-async`. Row structs
//! and the table definitions stay private to this module.
//!
//! ```ignore
//! use revision_tracker::outbound::persistence::{DbPool, DieselQuestionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tracker")).await?;
//! let questions = DieselQuestionRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_question_repository;
mod diesel_topic_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_question_repository::DieselQuestionRepository;
pub use diesel_topic_repository::DieselTopicRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
