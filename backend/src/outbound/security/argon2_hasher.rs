//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashes are PHC strings, so the salt and cost parameters travel with the
//! hash and older hashes keep verifying after a parameter change. Each call
//! runs on Tokio's blocking pool so a login never stalls an actix worker.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use async_trait::async_trait;
use tokio::task::spawn_blocking;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Argon2id with the crate's default cost parameters.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Hasher using the default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` off the async runtime with its own copy of the hasher.
    async fn offload<T, F>(&self, work: F) -> Result<T, CredentialHasherError>
    where
        T: Send + 'static,
        F: FnOnce(&Argon2<'static>) -> Result<T, CredentialHasherError> + Send + 'static,
    {
        let argon2 = self.argon2.clone();
        spawn_blocking(move || work(&argon2))
            .await
            .map_err(|err| CredentialHasherError::worker(err.to_string()))?
    }
}

fn hash_with(argon2: &Argon2<'static>, password: &str) -> Result<String, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::hash(err.to_string()))
}

fn verify_with(
    argon2: &Argon2<'static>,
    password: &str,
    stored_hash: &str,
) -> Result<bool, CredentialHasherError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        let password = Zeroizing::new(password.to_owned());
        self.offload(move |argon2| hash_with(argon2, &password)).await
    }

    async fn verify(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, CredentialHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let stored_hash = stored_hash.to_owned();
        self.offload(move |argon2| verify_with(argon2, &password, &stored_hash))
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn verifies_only_the_original_password() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn salts_each_hash() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("correct horse").await.expect("hash");
        let second = hasher.hash("correct horse").await.expect("hash");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        let err = Argon2Hasher::new()
            .verify("correct horse", "not-a-phc-string")
            .await
            .expect_err("malformed");
        assert!(matches!(err, CredentialHasherError::MalformedHash { .. }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn runtime_keeps_polling_while_a_hash_is_computed() {
        let hasher = Arc::new(Argon2Hasher::new());
        let task = {
            let hasher = Arc::clone(&hasher);
            tokio::spawn(async move { hasher.hash("correct horse").await })
        };

        let mut polls = 0_u32;
        while !task.is_finished() {
            polls += 1;
            tokio::task::yield_now().await;
        }

        let hash = task.await.expect("join").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(polls > 1, "hashing blocked the only runtime thread");
    }
}
