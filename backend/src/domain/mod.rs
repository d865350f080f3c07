//! Domain primitives, aggregates, and application services.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Types are immutable from outside the domain; invariants and serialisation
//! contracts (serde) are documented on each type.

mod account_service;
mod article;
mod article_service;
pub mod auth;
mod comment;
mod engagement_service;
pub mod error;
pub mod ports;
mod trace_id;
mod user;

pub use self::account_service::AccountService;
pub use self::article::{
    Article, ArticleFields, ArticleId, ArticleRecord, ArticleValidationError, AuthorShelf,
    TITLE_MAX,
};
pub use self::article_service::ArticleService;
pub use self::auth::{CredentialValidationError, LoginCredentials, RegistrationRequest};
pub use self::comment::{
    Comment, CommentContent, CommentId, CommentRecord, CommentValidationError,
};
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
