//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so tests can swap in mocks or the in-memory wiring.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CredentialHasher, LoginService, ProgressQuery, QuestionCommand, QuestionQuery,
    QuestionRepository, RegistrationService, RevisionSelector, TopicRegistry, TopicRepository,
    UserProfileQuery, UserRepository,
};
use crate::domain::{
    AccountService, ProgressService, QuestionService, RevisionService, TopicRegistryService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub questions: Arc<dyn QuestionCommand>,
    pub questions_query: Arc<dyn QuestionQuery>,
    pub topics: Arc<dyn TopicRegistry>,
    pub revision: Arc<dyn RevisionSelector>,
    pub progress: Arc<dyn ProgressQuery>,
}

impl HttpState {
    /// Wire the domain services over one set of driven adapters.
    ///
    /// The question service and the HTTP topic endpoints share a single
    /// topic registry, so vivification and listing see the same records.
    pub fn from_repositories<U, T, Q, H>(
        users: Arc<U>,
        topics: Arc<T>,
        questions: Arc<Q>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        T: TopicRepository + 'static,
        Q: QuestionRepository + 'static,
        H: CredentialHasher + 'static,
    {
        let accounts = Arc::new(AccountService::new(users, hasher, Arc::clone(&clock)));
        let registry: Arc<dyn TopicRegistry> =
            Arc::new(TopicRegistryService::new(topics, Arc::clone(&clock)));
        let question_service = Arc::new(QuestionService::new(
            Arc::clone(&questions),
            Arc::clone(&registry),
            clock,
        ));

        Self {
            login: accounts.clone(),
            registration: accounts.clone(),
            profile: accounts,
            questions: question_service.clone(),
            questions_query: question_service,
            topics: registry,
            revision: Arc::new(RevisionService::new(Arc::clone(&questions))),
            progress: Arc::new(ProgressService::new(questions)),
        }
    }
}
