//! Driving port resolving a session subject back to a user.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for session restoration.
///
/// Every request carrying a session re-resolves its user id through this
/// port; a `None` result means the account has vanished and the session must
/// be treated as anonymous.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fetch the user behind a session subject, if they still exist.
    async fn fetch(&self, id: &UserId) -> Result<Option<User>, Error>;
}
