//! Driving port for article read models.

use async_trait::async_trait;

use crate::domain::{Article, ArticleId, AuthorShelf, Error, UserId};

/// Domain use-case port for browsing articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// All published articles, newest publication first.
    async fn list_published(&self) -> Result<Vec<Article>, Error>;

    /// An author's dashboard: published and draft articles, partitioned.
    async fn shelf_for_author(&self, author: &UserId) -> Result<AuthorShelf, Error>;

    /// Resolve an article for a (possibly anonymous) reader.
    ///
    /// Published articles are public. Drafts resolve only for their owning
    /// author; everyone else gets `NotFound` — a draft's existence is not
    /// disclosed.
    async fn fetch_for_reader(
        &self,
        id: &ArticleId,
        viewer: Option<UserId>,
    ) -> Result<Article, Error>;
}
