//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email constraint rejected an insert.
        DuplicateEmail => "email already registered",
    }
}

/// A user together with their stored password digest.
///
/// Only the authentication path sees this type; everything else works with
/// the credential-free [`User`].
#[derive(Debug, Clone)]
pub struct UserWithCredentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with their password digest.
    ///
    /// Relies on the store's unique email constraint; a violation surfaces
    /// as [`UserPersistenceError::DuplicateEmail`]. There is no
    /// read-then-insert race.
    async fn create(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user and their digest by exact email match.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserWithCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
