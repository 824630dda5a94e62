//! PostgreSQL connection pool shared by the Diesel repositories.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const DEFAULT_MAX_SIZE: u32 = 10;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why the pool could not hand out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection came free before the checkout timeout.
    #[error("no database connection available: {message}")]
    Checkout { message: String },
    /// The pool could not open its first connection.
    #[error("database pool could not start: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Driver text for either variant, forwarded into repository errors.
    pub fn message(&self) -> &str {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Where to connect and how many connections to hold.
///
/// # Examples
/// ```
/// use revision_tracker::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/tracker").with_max_size(0);
/// assert_eq!(config.max_size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
}

impl PoolConfig {
    /// Settings for `database_url` with the default size cap.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Cap on open connections; at least one is always allowed.
    pub fn with_max_size(self, max_size: u32) -> Self {
        Self {
            max_size: max_size.max(1),
            ..self
        }
    }

    /// Maximum number of pooled connections.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Cheap-to-clone handle; every repository holds one.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool, keeping one connection warm.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        Pool::builder()
            .max_size(max_size)
            .min_idle(Some(1))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::Build {
                message: err.to_string(),
            })
    }

    /// Check out a connection, waiting at most the checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| PoolError::Checkout {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_size(None, DEFAULT_MAX_SIZE)]
    #[case::explicit_size(Some(4), 4)]
    #[case::zero_is_raised(Some(0), 1)]
    fn max_size_is_at_least_one(#[case] requested: Option<u32>, #[case] expected: u32) {
        let base = PoolConfig::new("postgres://localhost/tracker");
        let config = match requested {
            Some(size) => base.with_max_size(size),
            None => base,
        };
        assert_eq!(config.max_size(), expected);
    }

    #[rstest]
    fn checkout_message_reaches_callers() {
        let error = PoolError::Checkout {
            message: "timed out".to_owned(),
        };
        assert_eq!(error.message(), "timed out");
        assert_eq!(
            error.to_string(),
            "no database connection available: timed out"
        );
    }
}
