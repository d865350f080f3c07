//! PostgreSQL-backed `EngagementRepository` implementation using Diesel ORM.
//!
//! The like path runs `INSERT ... ON CONFLICT DO NOTHING` on the composite
//! `(article_id, user_id)` key together with a recount of `like_count` in one
//! transaction. Two concurrent likes for the same pair cannot both insert,
//! and the counter is recomputed from the likes relation rather than
//! incremented blindly, so it cannot drift inside this path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{EngagementPersistenceError, EngagementRepository, LikeOutcome};
use crate::domain::{ArticleId, Comment, CommentId, CommentRecord, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentRow, NewCommentRow, NewLikeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{articles, comments, likes, users};

/// Diesel-backed implementation of the engagement repository port.
#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> EngagementPersistenceError {
    map_basic_pool_error(error, EngagementPersistenceError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> EngagementPersistenceError {
    map_basic_diesel_error(
        error,
        EngagementPersistenceError::query,
        EngagementPersistenceError::connection,
    )
}

/// Convert a comment row plus its joined author name into a domain comment.
fn row_to_comment(
    row: CommentRow,
    author_name: Option<String>,
) -> Result<Comment, EngagementPersistenceError> {
    let CommentRow {
        id,
        article_id,
        user_id,
        content,
        created_at,
    } = row;

    Comment::try_from(CommentRecord {
        id: CommentId::from_uuid(id),
        article_id: ArticleId::from_uuid(article_id),
        author_id: user_id.map(UserId::from_uuid),
        author_name,
        content,
        created_at,
    })
    .map_err(|err| EngagementPersistenceError::query(err.to_string()))
}

#[async_trait]
impl EngagementRepository for DieselEngagementRepository {
    async fn insert_comment(
        &self,
        comment: &Comment,
    ) -> Result<(), EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCommentRow {
            id: *comment.id().as_uuid(),
            article_id: *comment.article_id().as_uuid(),
            user_id: comment.author_id().map(|id| *id.as_uuid()),
            content: comment.content(),
            created_at: comment.created_at(),
        };

        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn comments_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<Comment>, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(CommentRow, Option<String>)> = comments::table
            .left_join(users::table)
            .filter(comments::article_id.eq(article_id.as_uuid()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), users::display_name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, author_name)| row_to_comment(row, author_name))
            .collect()
    }

    async fn like(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<LikeOutcome, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let article = *article_id.as_uuid();
        let row = NewLikeRow {
            article_id: article,
            user_id: *user_id.as_uuid(),
            created_at: now,
        };

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let inserted = diesel::insert_into(likes::table)
                        .values(&row)
                        .on_conflict((likes::article_id, likes::user_id))
                        .do_nothing()
                        .execute(conn)
                        .await?;

                    let like_count: i64 = likes::table
                        .filter(likes::article_id.eq(article))
                        .count()
                        .get_result(conn)
                        .await?;

                    diesel::update(articles::table.filter(articles::id.eq(article)))
                        .set(articles::like_count.eq(like_count))
                        .execute(conn)
                        .await?;

                    Ok(LikeOutcome {
                        newly_liked: inserted > 0,
                        like_count,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(outcome)
    }

    async fn recount_likes(
        &self,
        article_id: &ArticleId,
    ) -> Result<i64, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let article = *article_id.as_uuid();

        let like_count = conn
            .transaction(|conn| {
                async move {
                    let like_count: i64 = likes::table
                        .filter(likes::article_id.eq(article))
                        .count()
                        .get_result(conn)
                        .await?;

                    diesel::update(articles::table.filter(articles::id.eq(article)))
                        .set(articles::like_count.eq(like_count))
                        .execute(conn)
                        .await?;

                    Ok(like_count)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(like_count)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(content: &str) -> CommentRow {
        CommentRow {
            id: Uuid::new_v4(),
            article_id: Uuid::new_v4(),
            user_id: None,
            content: content.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(
            repo_err,
            EngagementPersistenceError::Connection { .. }
        ));
    }

    #[rstest]
    fn anonymous_rows_convert_without_an_author() {
        let comment = row_to_comment(row("nice"), None).expect("valid row");
        assert!(comment.author_id().is_none());
        assert!(comment.author_name().is_none());
    }

    #[rstest]
    fn joined_author_names_survive_conversion() {
        let mut with_author = row("nice");
        with_author.user_id = Some(Uuid::new_v4());

        let comment =
            row_to_comment(with_author, Some("Ann".to_owned())).expect("valid row");
        assert_eq!(comment.author_name(), Some("Ann"));
    }

    #[rstest]
    fn blank_content_rows_are_rejected() {
        let error = row_to_comment(row("   "), None).expect_err("blank content should fail");
        assert!(matches!(error, EngagementPersistenceError::Query { .. }));
    }
}
