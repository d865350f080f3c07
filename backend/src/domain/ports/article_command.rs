//! Driving port for article lifecycle mutations.

use async_trait::async_trait;

use crate::domain::{Article, ArticleFields, ArticleId, Error, UserId};

/// Domain use-case port owning the draft → published state machine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Create a new draft owned by `author`.
    async fn create_draft(
        &self,
        author: &UserId,
        fields: ArticleFields,
    ) -> Result<Article, Error>;

    /// Edit an article's content in any lifecycle state.
    ///
    /// `Forbidden` when `author` is not the owner; `NotFound` when the
    /// article does not exist. `modified_at` is refreshed on success.
    async fn edit(
        &self,
        id: &ArticleId,
        author: &UserId,
        fields: ArticleFields,
    ) -> Result<Article, Error>;

    /// Publish an article; the first publish wins.
    ///
    /// Re-publishing an already-published article is a no-op returning the
    /// article with its original timestamp, guarding against double-submit.
    async fn publish(&self, id: &ArticleId) -> Result<Article, Error>;

    /// Delete an article and, by cascade, its comments and likes.
    ///
    /// `Forbidden` when `author` is not the owner.
    async fn delete(&self, id: &ArticleId, author: &UserId) -> Result<(), Error>;
}
