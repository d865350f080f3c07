//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O. The
//! bundle is assembled once at startup by the server's state builders — no
//! process-wide singletons.

use std::sync::Arc;

use crate::domain::ports::{
    ArticleCommand, ArticleQuery, EngagementCommand, EngagementQuery, LoginService,
    RegistrationService, UserProfileQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub articles: Arc<dyn ArticleCommand>,
    pub articles_query: Arc<dyn ArticleQuery>,
    pub engagement: Arc<dyn EngagementCommand>,
    pub engagement_query: Arc<dyn EngagementQuery>,
}
