//! In-memory persistence adapters.
//!
//! Stand-ins for the Diesel adapters when no database is configured (local
//! development, integration tests). State lives for the process lifetime
//! only.

mod repositories;
mod store;

pub use repositories::{
    MemoryArticleRepository, MemoryEngagementRepository, MemoryUserRepository,
};
pub use store::MemoryStore;
