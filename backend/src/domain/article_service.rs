//! Article domain service: the draft → published lifecycle.
//!
//! Ownership is enforced here, uniformly, for edit and delete: an
//! authenticated non-owner is rejected with `Forbidden` before any mutation
//! reaches the store. Publish requires only an authenticated caller (the
//! gate's concern) and is idempotent — the first publish wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ArticleCommand, ArticlePersistenceError, ArticleQuery, ArticleRepository};
use crate::domain::{Article, ArticleFields, ArticleId, AuthorShelf, Error, UserId};

fn map_repository_error(error: ArticlePersistenceError) -> Error {
    match error {
        ArticlePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticlePersistenceError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

fn not_found(id: &ArticleId) -> Error {
    Error::not_found(format!("article {id} not found"))
}

/// Article service implementing the lifecycle command and query ports.
#[derive(Clone)]
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl ArticleService {
    /// Create a new service over an article repository and clock.
    pub fn new(articles: Arc<dyn ArticleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { articles, clock }
    }

    async fn owned_article(&self, id: &ArticleId, author: &UserId) -> Result<Article, Error> {
        let article = self
            .articles
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;

        if article.author_id() == author {
            Ok(article)
        } else {
            Err(Error::forbidden("only the owning author may modify this article"))
        }
    }
}

#[async_trait]
impl ArticleCommand for ArticleService {
    async fn create_draft(
        &self,
        author: &UserId,
        fields: ArticleFields,
    ) -> Result<Article, Error> {
        let article = Article::draft(*author, fields, self.clock.utc());
        self.articles
            .insert(&article)
            .await
            .map_err(map_repository_error)?;
        tracing::info!(article_id = %article.id(), author_id = %author, "draft created");
        Ok(article)
    }

    async fn edit(
        &self,
        id: &ArticleId,
        author: &UserId,
        fields: ArticleFields,
    ) -> Result<Article, Error> {
        let _ = self.owned_article(id, author).await?;

        self.articles
            .update_content(id, &fields, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn publish(&self, id: &ArticleId) -> Result<Article, Error> {
        let article = self
            .articles
            .publish(id, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(article_id = %id, "article published");
        Ok(article)
    }

    async fn delete(&self, id: &ArticleId, author: &UserId) -> Result<(), Error> {
        let _ = self.owned_article(id, author).await?;

        let removed = self
            .articles
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            tracing::info!(article_id = %id, "article deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

#[async_trait]
impl ArticleQuery for ArticleService {
    async fn list_published(&self) -> Result<Vec<Article>, Error> {
        self.articles
            .list_published()
            .await
            .map_err(map_repository_error)
    }

    async fn shelf_for_author(&self, author: &UserId) -> Result<AuthorShelf, Error> {
        self.articles
            .list_for_author(author)
            .await
            .map_err(map_repository_error)
    }

    async fn fetch_for_reader(
        &self,
        id: &ArticleId,
        viewer: Option<UserId>,
    ) -> Result<Article, Error> {
        let article = self
            .articles
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;

        // A draft's existence is not disclosed to anyone but its author.
        if article.is_published() || viewer.as_ref() == Some(article.author_id()) {
            Ok(article)
        } else {
            Err(not_found(id))
        }
    }
}
