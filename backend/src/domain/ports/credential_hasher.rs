//! Driven port for password hashing.
//!
//! Hashing is CPU-bound; adapters must not run it on an async worker thread.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing or verifying a password.
    pub enum CredentialHasherError {
        /// The hasher could not produce a hash.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not a valid PHC string.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
        /// The background hashing task did not finish.
        Worker { message: String } => "password hashing task failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted hash suitable for storage.
    async fn hash(&self, password: &str) -> Result<String, CredentialHasherError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    async fn verify(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, CredentialHasherError>;
}
