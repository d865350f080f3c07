//! Driving port for reading an article's engagement.

use async_trait::async_trait;

use crate::domain::{ArticleId, Comment, Error};

/// Domain use-case port for reading the comment log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementQuery: Send + Sync {
    /// All comments on an article, oldest first.
    async fn comments_for(&self, article_id: &ArticleId) -> Result<Vec<Comment>, Error>;
}
