//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationRequest, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create a new account and return its public identity.
    ///
    /// A duplicate email maps to `Conflict`; no duplicate user row can ever
    /// exist for one email.
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error>;
}
