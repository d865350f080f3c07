//! Wiring of domain services to repository adapters.
//!
//! Every component receives its store handle through its constructor; no
//! process-wide singletons. With a database pool the Diesel adapters are
//! used, otherwise everything runs over one shared in-memory store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use backend::domain::{AccountService, ArticleService, EngagementService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{
    MemoryArticleRepository, MemoryEngagementRepository, MemoryStore, MemoryUserRepository,
};
use backend::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselEngagementRepository, DieselUserRepository,
};
use backend::outbound::security::Argon2PasswordHasher;

use super::config::ServerConfig;

fn diesel_http_state(pool: DbPool) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let articles = Arc::new(DieselArticleRepository::new(pool.clone()));
    let engagement = Arc::new(DieselEngagementRepository::new(pool));

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

fn memory_http_state() -> HttpState {
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

/// Build the HTTP state bundle from the server configuration.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_http_state(pool.clone()),
        None => {
            warn!("no database configured; serving from in-memory repositories");
            memory_http_state()
        }
    };
    web::Data::new(state)
}
