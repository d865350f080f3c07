//! Shared in-memory state backing the memory repositories.
//!
//! One store instance is shared by the user, article, and engagement
//! repositories so cross-relation operations (the like counter, cascade
//! deletes) stay consistent. Reads take a shared lock; mutations take the
//! write lock, which is also the atomic unit for the like
//! insert-and-recount. A poisoned lock is reported as an error rather than
//! propagating the panic.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Article, Comment, User};

/// Raised when the store lock was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("memory store lock poisoned")]
pub struct StorePoisoned;

/// A registered user together with their password digest.
#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Mutable state shared by the memory repositories.
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub users: HashMap<Uuid, StoredUser>,
    pub articles: HashMap<Uuid, Article>,
    pub comments: Vec<Comment>,
    /// Like facts keyed by the unique (article, user) pair.
    pub likes: BTreeMap<(Uuid, Uuid), DateTime<Utc>>,
}

impl MemoryState {
    /// Count the like rows for one article.
    pub fn like_count(&self, article_id: &Uuid) -> i64 {
        self.likes
            .keys()
            .filter(|(article, _)| article == article_id)
            .count() as i64
    }
}

/// Concurrent in-memory store; the sole synchronisation point of the
/// memory adapters.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StorePoisoned> {
        self.state.read().map_err(|_| StorePoisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StorePoisoned> {
        self.state.write().map_err(|_| StorePoisoned)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the shared state helpers.
    use super::*;

    #[test]
    fn like_count_only_counts_the_requested_article() {
        let mut state = MemoryState::default();
        let target = Uuid::new_v4();
        let other = Uuid::new_v4();
        let now = Utc::now();
        state.likes.insert((target, Uuid::new_v4()), now);
        state.likes.insert((target, Uuid::new_v4()), now);
        state.likes.insert((other, Uuid::new_v4()), now);

        assert_eq!(state.like_count(&target), 2);
        assert_eq!(state.like_count(&other), 1);
    }
}
