//! Account domain service: registration, authentication, session subjects.
//!
//! Implements the account-facing driving ports over the user repository and
//! password hasher ports. Credential failures are deliberately
//! indistinguishable: an unknown email and a failed verification both yield
//! the same generic rejection so the login endpoint cannot be used to
//! enumerate accounts. Infrastructure failures take a different path and are
//! never folded into that rejection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, RegistrationService, UserPersistenceError,
    UserProfileQuery, UserRepository,
};
use crate::domain::{Error, LoginCredentials, RegistrationRequest, User, UserId};

/// Message returned for every credential failure, regardless of cause.
const GENERIC_REJECTION: &str = "incorrect email or password";

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::conflict("email already registered"),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    // Hasher faults are infrastructure, not credential mismatches.
    Error::internal(error.to_string())
}

/// Account service implementing registration, login, and profile lookup.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Create a new service over a user repository and password hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl RegistrationService for AccountService {
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error> {
        let digest = self.hasher.hash(request.password()).map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            request.display_name().clone(),
            request.email().clone(),
        );

        self.users
            .create(&user, &digest)
            .await
            .map_err(map_user_persistence_error)?;

        tracing::info!(user_id = %user.id(), "account registered");
        Ok(user)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;

        let Some(stored) = stored else {
            return Err(Error::unauthorized(GENERIC_REJECTION));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;

        if matches {
            Ok(stored.user)
        } else {
            Err(Error::unauthorized(GENERIC_REJECTION))
        }
    }
}

#[async_trait]
impl UserProfileQuery for AccountService {
    async fn fetch(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)
    }
}
