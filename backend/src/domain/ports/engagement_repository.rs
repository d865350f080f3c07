//! Port abstraction for comment and like persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ArticleId, Comment, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by engagement repository adapters.
    pub enum EngagementPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "engagement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "engagement repository query failed: {message}",
    }
}

/// Result of a like attempt.
///
/// `like_count` is the counter recomputed from the likes relation inside the
/// same atomic unit as the insert, so it is exact whether or not the like was
/// new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Whether this call inserted a new like (false: the pair already existed).
    pub newly_liked: bool,
    /// The article's like count after the operation.
    pub like_count: i64,
}

#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Append a comment to an article's comment log.
    async fn insert_comment(
        &self,
        comment: &Comment,
    ) -> Result<(), EngagementPersistenceError>;

    /// All comments for an article, oldest first.
    async fn comments_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<Comment>, EngagementPersistenceError>;

    /// Record a like for `(article_id, user_id)` and refresh the counter.
    ///
    /// The uniqueness check, the insert, and the counter recount execute in
    /// one atomic unit so two concurrent calls cannot both count as new.
    /// A duplicate pair is a no-op reported via
    /// [`LikeOutcome::newly_liked`] — never an error.
    async fn like(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<LikeOutcome, EngagementPersistenceError>;

    /// Recompute an article's like counter from the likes relation.
    ///
    /// Repairs drift between the stored counter and the relation; returns
    /// the recomputed count.
    async fn recount_likes(
        &self,
        article_id: &ArticleId,
    ) -> Result<i64, EngagementPersistenceError>;
}
