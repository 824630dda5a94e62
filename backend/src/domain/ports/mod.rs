//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`*Command`, `*Query`, `*Service`, `TopicRegistry`,
//! `RevisionSelector`) are what inbound adapters call. Driven ports
//! (`*Repository`, `CredentialHasher`) are what the domain services need from
//! outbound adapters; each exposes a typed error built with
//! `define_port_error!`.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod login_service;
mod progress_query;
mod question_command;
mod question_query;
mod question_repository;
mod revision_selector;
mod topic_registry;
mod topic_repository;
mod user_repository;

#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationService, MockUserProfileQuery};
pub use login_service::{LoginService, RegistrationService, UserProfileQuery};
#[cfg(test)]
pub use progress_query::MockProgressQuery;
pub use progress_query::ProgressQuery;
#[cfg(test)]
pub use question_command::MockQuestionCommand;
pub use question_command::QuestionCommand;
#[cfg(test)]
pub use question_query::MockQuestionQuery;
pub use question_query::QuestionQuery;
#[cfg(test)]
pub use question_repository::MockQuestionRepository;
pub use question_repository::{QuestionRepository, QuestionRepositoryError};
#[cfg(test)]
pub use revision_selector::MockRevisionSelector;
pub use revision_selector::RevisionSelector;
#[cfg(test)]
pub use topic_registry::MockTopicRegistry;
pub use topic_registry::TopicRegistry;
#[cfg(test)]
pub use topic_repository::MockTopicRepository;
pub use topic_repository::{TopicRepository, TopicRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
