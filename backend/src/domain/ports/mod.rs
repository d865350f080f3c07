//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod article_command;
mod article_query;
mod article_repository;
mod engagement_command;
mod engagement_query;
mod engagement_repository;
mod login_service;
mod password_hasher;
mod registration_service;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use article_command::MockArticleCommand;
pub use article_command::ArticleCommand;
#[cfg(test)]
pub use article_query::MockArticleQuery;
pub use article_query::ArticleQuery;
pub use article_repository::{ArticlePersistenceError, ArticleRepository};
#[cfg(test)]
pub use engagement_command::MockEngagementCommand;
pub use engagement_command::EngagementCommand;
#[cfg(test)]
pub use engagement_query::MockEngagementQuery;
pub use engagement_query::EngagementQuery;
pub use engagement_repository::{
    EngagementPersistenceError, EngagementRepository, LikeOutcome,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
pub use user_repository::{UserPersistenceError, UserRepository, UserWithCredentials};
