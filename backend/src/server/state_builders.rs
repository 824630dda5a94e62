//! Choose the driven adapters and build the HTTP state over them.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use revision_tracker::inbound::http::state::HttpState;
use revision_tracker::outbound::memory::MemoryStore;
use revision_tracker::outbound::persistence::{
    DbPool, DieselQuestionRepository, DieselTopicRepository, DieselUserRepository,
};
use revision_tracker::outbound::security::Argon2Hasher;

use super::ServerConfig;

fn diesel_state(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTopicRepository::new(pool.clone())),
        Arc::new(DieselQuestionRepository::new(pool.clone())),
        Arc::new(Argon2Hasher::new()),
        clock,
    )
}

fn memory_state(clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(MemoryStore::new());
    HttpState::from_repositories(
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        Arc::new(Argon2Hasher::new()),
        clock,
    )
}

/// PostgreSQL when a pool is configured, otherwise the in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            diesel_state(pool, clock)
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            memory_state(clock)
        }
    }
}
