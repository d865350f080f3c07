//! Engagement domain service: the comment log and like uniqueness.
//!
//! Duplicate likes are benign: the caller gets the article back with its
//! current count either way, and the uniqueness invariant lives in the
//! repository's atomic insert-and-recount. Counter drift is repaired through
//! `recount_likes`, never by error handling on the like path.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ArticlePersistenceError, ArticleRepository, EngagementCommand, EngagementPersistenceError,
    EngagementQuery, EngagementRepository,
};
use crate::domain::{Article, ArticleId, Comment, CommentContent, Error, User, UserId};

fn map_engagement_error(error: EngagementPersistenceError) -> Error {
    match error {
        EngagementPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("engagement repository unavailable: {message}"))
        }
        EngagementPersistenceError::Query { message } => {
            Error::internal(format!("engagement repository error: {message}"))
        }
    }
}

fn map_article_error(error: ArticlePersistenceError) -> Error {
    match error {
        ArticlePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticlePersistenceError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

/// Engagement service implementing the comment and like ports.
#[derive(Clone)]
pub struct EngagementService {
    engagement: Arc<dyn EngagementRepository>,
    articles: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl EngagementService {
    /// Create a new service over the engagement and article repositories.
    pub fn new(
        engagement: Arc<dyn EngagementRepository>,
        articles: Arc<dyn ArticleRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engagement,
            articles,
            clock,
        }
    }

    async fn existing_article(&self, id: &ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(format!("article {id} not found")))
    }
}

#[async_trait]
impl EngagementCommand for EngagementService {
    async fn add_comment(
        &self,
        article_id: &ArticleId,
        author: Option<User>,
        content: CommentContent,
    ) -> Result<Comment, Error> {
        let _ = self.existing_article(article_id).await?;

        let comment = Comment::new(*article_id, author.as_ref(), content, self.clock.utc());
        self.engagement
            .insert_comment(&comment)
            .await
            .map_err(map_engagement_error)?;
        Ok(comment)
    }

    async fn like(&self, article_id: &ArticleId, user: &UserId) -> Result<Article, Error> {
        let mut article = self.existing_article(article_id).await?;

        let outcome = self
            .engagement
            .like(article_id, user, self.clock.utc())
            .await
            .map_err(map_engagement_error)?;

        if !outcome.newly_liked {
            tracing::debug!(article_id = %article_id, user_id = %user, "duplicate like ignored");
        }
        article.set_like_count(outcome.like_count);
        Ok(article)
    }

    async fn recount_likes(&self, article_id: &ArticleId) -> Result<i64, Error> {
        let _ = self.existing_article(article_id).await?;

        self.engagement
            .recount_likes(article_id)
            .await
            .map_err(map_engagement_error)
    }
}

#[async_trait]
impl EngagementQuery for EngagementService {
    async fn comments_for(&self, article_id: &ArticleId) -> Result<Vec<Comment>, Error> {
        self.engagement
            .comments_for_article(article_id)
            .await
            .map_err(map_engagement_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for like idempotence and the comment log.
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    use super::*;
    use crate::domain::ports::LikeOutcome;
    use crate::domain::{ArticleFields, ErrorCode};
    use chrono::{DateTime, Local, Utc};
    use uuid::Uuid;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Default)]
    struct StubStore {
        articles: Mutex<HashMap<ArticleId, Article>>,
        comments: Mutex<Vec<Comment>>,
        likes: Mutex<BTreeSet<(Uuid, Uuid)>>,
    }

    impl StubStore {
        fn seed_article(&self, author: &UserId) -> Article {
            let fields =
                ArticleFields::try_from_parts("Hello", None, "World").expect("valid fields");
            let article = Article::draft(*author, fields, Utc::now());
            self.articles
                .lock()
                .expect("articles lock")
                .insert(*article.id(), article.clone());
            article
        }

        fn like_rows(&self, article_id: &ArticleId) -> usize {
            self.likes
                .lock()
                .expect("likes lock")
                .iter()
                .filter(|(article, _)| article == article_id.as_uuid())
                .count()
        }
    }

    #[async_trait]
    impl ArticleRepository for StubStore {
        async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
            self.articles
                .lock()
                .expect("articles lock")
                .insert(*article.id(), article.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            id: &ArticleId,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            Ok(self.articles.lock().expect("articles lock").get(id).cloned())
        }

        async fn update_content(
            &self,
            _id: &ArticleId,
            _fields: &ArticleFields,
            _modified_at: DateTime<Utc>,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            unimplemented!("not exercised by engagement tests")
        }

        async fn publish(
            &self,
            _id: &ArticleId,
            _now: DateTime<Utc>,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            unimplemented!("not exercised by engagement tests")
        }

        async fn delete(&self, _id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
            unimplemented!("not exercised by engagement tests")
        }

        async fn list_published(&self) -> Result<Vec<Article>, ArticlePersistenceError> {
            unimplemented!("not exercised by engagement tests")
        }

        async fn list_for_author(
            &self,
            _author_id: &UserId,
        ) -> Result<crate::domain::AuthorShelf, ArticlePersistenceError> {
            unimplemented!("not exercised by engagement tests")
        }
    }

    #[async_trait]
    impl EngagementRepository for StubStore {
        async fn insert_comment(
            &self,
            comment: &Comment,
        ) -> Result<(), EngagementPersistenceError> {
            self.comments
                .lock()
                .expect("comments lock")
                .push(comment.clone());
            Ok(())
        }

        async fn comments_for_article(
            &self,
            article_id: &ArticleId,
        ) -> Result<Vec<Comment>, EngagementPersistenceError> {
            let mut comments: Vec<Comment> = self
                .comments
                .lock()
                .expect("comments lock")
                .iter()
                .filter(|comment| comment.article_id() == article_id)
                .cloned()
                .collect();
            comments.sort_by_key(Comment::created_at);
            Ok(comments)
        }

        async fn like(
            &self,
            article_id: &ArticleId,
            user_id: &UserId,
            _now: DateTime<Utc>,
        ) -> Result<LikeOutcome, EngagementPersistenceError> {
            let newly_liked = self
                .likes
                .lock()
                .expect("likes lock")
                .insert((*article_id.as_uuid(), *user_id.as_uuid()));
            let like_count = self.like_rows(article_id) as i64;
            if let Some(article) = self
                .articles
                .lock()
                .expect("articles lock")
                .get_mut(article_id)
            {
                article.set_like_count(like_count);
            }
            Ok(LikeOutcome {
                newly_liked,
                like_count,
            })
        }

        async fn recount_likes(
            &self,
            article_id: &ArticleId,
        ) -> Result<i64, EngagementPersistenceError> {
            Ok(self.like_rows(article_id) as i64)
        }
    }

    fn service(store: Arc<StubStore>) -> EngagementService {
        EngagementService::new(
            store.clone(),
            store,
            Arc::new(FixedClock(Utc::now())),
        )
    }

    #[tokio::test]
    async fn liking_twice_keeps_a_single_like_row() {
        let store = Arc::new(StubStore::default());
        let author = UserId::random();
        let reader = UserId::random();
        let article = store.seed_article(&author);
        let service = service(store.clone());

        let first = service
            .like(article.id(), &reader)
            .await
            .expect("first like should succeed");
        let second = service
            .like(article.id(), &reader)
            .await
            .expect("duplicate like is benign");

        assert_eq!(first.like_count(), 1);
        assert_eq!(second.like_count(), 1, "duplicate must not double count");
        assert_eq!(store.like_rows(article.id()), 1);
    }

    #[tokio::test]
    async fn likes_from_distinct_users_accumulate() {
        let store = Arc::new(StubStore::default());
        let author = UserId::random();
        let article = store.seed_article(&author);
        let service = service(store.clone());

        let _ = service
            .like(article.id(), &UserId::random())
            .await
            .expect("like");
        let latest = service
            .like(article.id(), &UserId::random())
            .await
            .expect("like");

        assert_eq!(latest.like_count(), 2);
    }

    #[tokio::test]
    async fn liking_a_missing_article_is_not_found() {
        let store = Arc::new(StubStore::default());
        let service = service(store);

        let err = service
            .like(&ArticleId::random(), &UserId::random())
            .await
            .expect_err("missing article must fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn comments_are_returned_oldest_first() {
        let store = Arc::new(StubStore::default());
        let author = UserId::random();
        let article = store.seed_article(&author);
        let service = service(store.clone());

        for text in ["first", "second", "third"] {
            let content = CommentContent::new(text).expect("valid content");
            let _ = service
                .add_comment(article.id(), None, content)
                .await
                .expect("comment should append");
        }

        let comments = service
            .comments_for(article.id())
            .await
            .expect("comment listing");
        let texts: Vec<&str> = comments.iter().map(Comment::content).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn commenting_on_a_missing_article_is_not_found() {
        let store = Arc::new(StubStore::default());
        let service = service(store);
        let content = CommentContent::new("hello").expect("valid content");

        let err = service
            .add_comment(&ArticleId::random(), None, content)
            .await
            .expect_err("missing article must fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn recount_repairs_counter_drift() {
        let store = Arc::new(StubStore::default());
        let author = UserId::random();
        let article = store.seed_article(&author);
        let service = service(store.clone());

        let _ = service
            .like(article.id(), &UserId::random())
            .await
            .expect("like");
        // Simulate drift: the stored counter disagrees with the relation.
        if let Some(stored) = store
            .articles
            .lock()
            .expect("articles lock")
            .get_mut(article.id())
        {
            stored.set_like_count(41);
        }

        let recounted = service
            .recount_likes(article.id())
            .await
            .expect("recount should succeed");

        assert_eq!(recounted, 1);
    }
}
