//! Account services: registration, login and current-user lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, LoginService, RegistrationService, UserProfileQuery,
    UserRepository, UserRepositoryError,
};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId, Username};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { .. } => Error::conflict("username already taken")
            .with_details(json!({ "field": "username", "code": "taken" })),
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Account service implementing the login, registration and profile ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    user_repo: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Serve accounts from `user_repo`, hashing with `hasher`.
    pub fn new(user_repo: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repo,
            hasher,
            clock,
        }
    }
}

#[async_trait]
impl<U, H> RegistrationService for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let user = User {
            id: UserId::random(),
            username: registration.username().clone(),
            password_hash,
            created_at: self.clock.utc(),
        };

        self.user_repo.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, username = %user.username, "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // A name that could never have been registered cannot match an account.
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let Some(user) = self
            .user_repo
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            warn!(user_id = %user.id, "rejected login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id, "login succeeded");
        Ok(user.id)
    }
}

#[async_trait]
impl<U, H> UserProfileQuery for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCredentialHasher, MockUserRepository};
    use crate::test_support::{FixtureClock, fixture_timestamp};
    use rstest::rstest;

    type Service = AccountService<MockUserRepository, MockCredentialHasher>;

    fn service(users: MockUserRepository, hasher: MockCredentialHasher) -> Service {
        AccountService::new(Arc::new(users), Arc::new(hasher), FixtureClock::shared())
    }

    fn stored_user() -> User {
        User {
            id: UserId::random(),
            username: Username::new("ada").expect("username"),
            password_hash: "$argon2id$stored".to_owned(),
            created_at: fixture_timestamp(),
        }
    }

    fn credentials(username: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, "hunter22").expect("credentials")
    }

    #[tokio::test]
    async fn register_hashes_password_and_persists() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password == "correct horse")
            .times(1)
            .return_once(|_| Ok("$argon2id$hash".to_owned()));
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|user| user.password_hash == "$argon2id$hash")
            .times(1)
            .return_once(|_| Ok(()));

        let registration =
            Registration::try_from_parts("ada", "correct horse").expect("registration");
        let user = service(users, hasher)
            .register(&registration)
            .await
            .expect("register succeeds");
        assert_eq!(user.username.as_ref(), "ada");
        assert_eq!(user.created_at, fixture_timestamp());
    }

    #[tokio::test]
    async fn register_reports_taken_username_as_conflict() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Ok("$argon2id$hash".to_owned()));
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .return_once(|_| Err(UserRepositoryError::duplicate_username("ada")));

        let registration =
            Registration::try_from_parts("ada", "correct horse").expect("registration");
        let err = service(users, hasher)
            .register(&registration)
            .await
            .expect_err("duplicate username");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case::unknown_user(None, false)]
    #[case::wrong_password(Some(stored_user()), false)]
    #[tokio::test]
    async fn failed_logins_are_indistinguishable(
        #[case] found: Option<User>,
        #[case] verified: bool,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(found));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().returning(move |_, _| Ok(verified));

        let err = service(users, hasher)
            .authenticate(&credentials("ada"))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn malformed_username_is_unauthorized_without_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();

        let err = service(users, MockCredentialHasher::new())
            .authenticate(&credentials("has spaces"))
            .await
            .expect_err("login fails");
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn matching_password_returns_user_id() {
        let user = stored_user();
        let expected = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(user)));
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_verify()
            .withf(|password, hash| password == "hunter22" && hash == "$argon2id$stored")
            .return_once(|_, _| Ok(true));

        let id = service(users, hasher)
            .authenticate(&credentials("ada"))
            .await
            .expect("login succeeds");
        assert_eq!(id, expected);
    }

    #[tokio::test]
    async fn current_user_of_deleted_account_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(users, MockCredentialHasher::new())
            .current_user(&UserId::random())
            .await
            .expect_err("missing account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
