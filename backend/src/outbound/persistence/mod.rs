//! PostgreSQL persistence adapters built on Diesel.

mod diesel_article_repository;
mod diesel_basic_error_mapping;
mod diesel_engagement_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_engagement_repository::DieselEngagementRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
