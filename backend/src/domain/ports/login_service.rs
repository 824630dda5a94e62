//! Driving ports for account use-cases: login, registration and the
//! current-user lookup.
//!
//! Inbound adapters authenticate through these traits without importing the
//! persistence or hashing adapters behind them.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Authenticate credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the id of the account matching `credentials`.
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// `Unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Create accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new account. A taken username is a `Conflict`.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}

/// Resolve the account behind a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// `Unauthorized` when the account no longer exists.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
