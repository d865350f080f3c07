//! Shared fixtures for integration tests.
//!
//! Compiled only with the `test-support` feature (enabled by this crate's
//! own dev-dependency) or under `cfg(test)`. Provides a fully wired
//! memory-backed HTTP state and a permissive session middleware so tests can
//! assemble the API without a database.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::{AccountService, ArticleService, EngagementService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    MemoryArticleRepository, MemoryEngagementRepository, MemoryStore, MemoryUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

/// Build an [`HttpState`] wired entirely over a fresh in-memory store.
pub fn memory_http_state() -> HttpState {
    let store = Arc::new(MemoryStore::default());
    let clock = Arc::new(DefaultClock);

    let users = Arc::new(MemoryUserRepository::new(store.clone()));
    let articles = Arc::new(MemoryArticleRepository::new(store.clone()));
    let engagement = Arc::new(MemoryEngagementRepository::new(store));

    let account = Arc::new(AccountService::new(users, Arc::new(Argon2PasswordHasher)));
    let article_service = Arc::new(ArticleService::new(articles.clone(), clock.clone()));
    let engagement_service = Arc::new(EngagementService::new(engagement, articles, clock));

    HttpState {
        registration: account.clone(),
        login: account.clone(),
        profile: account,
        articles: article_service.clone(),
        articles_query: article_service,
        engagement: engagement_service.clone(),
        engagement_query: engagement_service,
    }
}

/// Build a session middleware configured for tests.
///
/// Fresh key per invocation; `Secure` disabled for plain-HTTP test calls.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
