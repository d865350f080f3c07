//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! The publish mutation is guarded by `published_at IS NULL` so the first
//! publish wins at the store: a concurrent or repeated publish executes as a
//! zero-row update and the stored timestamp survives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ArticlePersistenceError, ArticleRepository};
use crate::domain::{
    Article, ArticleFields, ArticleId, ArticleRecord, AuthorShelf, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ArticleContentUpdate, ArticleRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

/// Diesel-backed implementation of the article repository port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_row(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = articles::table
            .filter(articles::id.eq(id.as_uuid()))
            .select(ArticleRow::as_select())
            .first::<ArticleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_article).transpose()
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ArticlePersistenceError {
    map_basic_pool_error(error, ArticlePersistenceError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ArticlePersistenceError {
    map_basic_diesel_error(
        error,
        ArticlePersistenceError::query,
        ArticlePersistenceError::connection,
    )
}

/// Convert a database row into a validated domain article.
fn row_to_article(row: ArticleRow) -> Result<Article, ArticlePersistenceError> {
    let ArticleRow {
        id,
        author_id,
        title,
        subtitle,
        body,
        created_at,
        modified_at,
        published_at,
        like_count,
    } = row;

    Article::try_from(ArticleRecord {
        id: ArticleId::from_uuid(id),
        author_id: UserId::from_uuid(author_id),
        title,
        subtitle,
        body,
        created_at,
        modified_at,
        published_at,
        like_count,
    })
    .map_err(|err| ArticlePersistenceError::query(err.to_string()))
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewArticleRow {
            id: *article.id().as_uuid(),
            author_id: *article.author_id().as_uuid(),
            title: article.title(),
            subtitle: article.subtitle(),
            body: article.body(),
            created_at: article.created_at(),
            modified_at: article.modified_at(),
            published_at: article.published_at(),
            like_count: article.like_count(),
        };

        diesel::insert_into(articles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        self.fetch_row(id).await
    }

    async fn update_content(
        &self,
        id: &ArticleId,
        fields: &ArticleFields,
        modified_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = ArticleContentUpdate {
            title: fields.title(),
            subtitle: Some(fields.subtitle()),
            body: fields.body(),
            modified_at,
        };

        let affected = diesel::update(articles::table.filter(articles::id.eq(id.as_uuid())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Ok(None);
        }
        drop(conn);
        self.fetch_row(id).await
    }

    async fn publish(
        &self,
        id: &ArticleId,
        now: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Zero rows affected means "already published" as often as "missing";
        // the follow-up fetch distinguishes the two.
        diesel::update(
            articles::table
                .filter(articles::id.eq(id.as_uuid()))
                .filter(articles::published_at.is_null()),
        )
        .set(articles::published_at.eq(Some(now)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        drop(conn);
        self.fetch_row(id).await
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Comments and likes go with the article via ON DELETE CASCADE.
        let affected = diesel::delete(articles::table.filter(articles::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn list_published(&self) -> Result<Vec<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ArticleRow> = articles::table
            .filter(articles::published_at.is_not_null())
            .order((articles::published_at.desc(), articles::id.desc()))
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_article).collect()
    }

    async fn list_for_author(
        &self,
        author_id: &UserId,
    ) -> Result<AuthorShelf, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let published_rows: Vec<ArticleRow> = articles::table
            .filter(
                articles::author_id
                    .eq(author_id.as_uuid())
                    .and(articles::published_at.is_not_null()),
            )
            .order((articles::published_at.desc(), articles::id.desc()))
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let draft_rows: Vec<ArticleRow> = articles::table
            .filter(
                articles::author_id
                    .eq(author_id.as_uuid())
                    .and(articles::published_at.is_null()),
            )
            .order((articles::created_at.desc(), articles::id.desc()))
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(AuthorShelf {
            published: published_rows
                .into_iter()
                .map(row_to_article)
                .collect::<Result<Vec<_>, _>>()?,
            drafts: draft_rows
                .into_iter()
                .map(row_to_article)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
