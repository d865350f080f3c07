//! Port abstraction for article persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Article, ArticleFields, ArticleId, AuthorShelf, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
    }
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Persist a freshly created draft.
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError>;

    /// Fetch an article by identifier.
    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Replace the editable content of an article and refresh `modified_at`.
    ///
    /// Returns the updated article, or `None` when it no longer exists.
    /// Ownership checks happen in the service layer before this call.
    async fn update_content(
        &self,
        id: &ArticleId,
        fields: &ArticleFields,
        modified_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Set `published_at = now` where it is currently unset.
    ///
    /// The guard makes the first publish win: repeat calls leave the stored
    /// timestamp untouched. Returns the article as stored afterwards, or
    /// `None` when it does not exist.
    async fn publish(
        &self,
        id: &ArticleId,
        now: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Delete an article; the schema cascades to its comments and likes.
    ///
    /// Returns whether a row was removed.
    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError>;

    /// All published articles, newest publication first.
    async fn list_published(&self) -> Result<Vec<Article>, ArticlePersistenceError>;

    /// An author's articles partitioned into published and drafts.
    async fn list_for_author(
        &self,
        author_id: &UserId,
    ) -> Result<AuthorShelf, ArticlePersistenceError>;
}
