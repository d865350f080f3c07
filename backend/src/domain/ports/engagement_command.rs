//! Driving port for reader engagement: comments and likes.

use async_trait::async_trait;

use crate::domain::{Article, ArticleId, Comment, CommentContent, Error, User, UserId};

/// Domain use-case port owning the comment log and like uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementCommand: Send + Sync {
    /// Append a comment to an article.
    ///
    /// `author` is `None` for anonymous comments. `NotFound` when the
    /// article does not exist.
    async fn add_comment(
        &self,
        article_id: &ArticleId,
        author: Option<User>,
        content: CommentContent,
    ) -> Result<Comment, Error>;

    /// Like an article on behalf of `user`.
    ///
    /// At most one like exists per `(article, user)` pair; a repeat like is
    /// a benign no-op. Returns the article with its up-to-date like count in
    /// both cases.
    async fn like(&self, article_id: &ArticleId, user: &UserId) -> Result<Article, Error>;

    /// Recompute an article's like counter from the likes relation.
    ///
    /// Reconciliation tool for counter drift after partial failures; returns
    /// the recomputed count.
    async fn recount_likes(&self, article_id: &ArticleId) -> Result<i64, Error>;
}
