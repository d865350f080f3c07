//! In-memory implementations of the driven persistence ports.
//!
//! Selected by the server when no database is configured, and used by the
//! integration tests. Behaviour mirrors the Diesel adapters: unique email on
//! insert, first-publish-wins, cascade delete of comments and likes, and the
//! like insert-and-recount under a single write lock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ArticlePersistenceError, ArticleRepository, EngagementPersistenceError, EngagementRepository,
    LikeOutcome, UserPersistenceError, UserRepository, UserWithCredentials,
};
use crate::domain::{
    Article, ArticleFields, ArticleId, AuthorShelf, Comment, EmailAddress, User, UserId,
};

use super::store::{MemoryStore, StorePoisoned, StoredUser};

/// In-memory implementation of the user repository port.
#[derive(Clone)]
pub struct MemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl MemoryUserRepository {
    /// Create a repository over the shared store.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl From<StorePoisoned> for UserPersistenceError {
    fn from(err: StorePoisoned) -> Self {
        Self::query(err.to_string())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.store.write()?;
        if state
            .users
            .values()
            .any(|stored| stored.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        state.users.insert(
            *user.id().as_uuid(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserWithCredentials>, UserPersistenceError> {
        let state = self.store.read()?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email() == email)
            .map(|stored| UserWithCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.store.read()?;
        Ok(state.users.get(id.as_uuid()).map(|stored| stored.user.clone()))
    }
}

/// In-memory implementation of the article repository port.
#[derive(Clone)]
pub struct MemoryArticleRepository {
    store: Arc<MemoryStore>,
}

impl MemoryArticleRepository {
    /// Create a repository over the shared store.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl From<StorePoisoned> for ArticlePersistenceError {
    fn from(err: StorePoisoned) -> Self {
        Self::query(err.to_string())
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut state = self.store.write()?;
        state.articles.insert(*article.id().as_uuid(), article.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let state = self.store.read()?;
        Ok(state.articles.get(id.as_uuid()).cloned())
    }

    async fn update_content(
        &self,
        id: &ArticleId,
        fields: &ArticleFields,
        modified_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut state = self.store.write()?;
        Ok(state.articles.get_mut(id.as_uuid()).map(|article| {
            article.apply_fields(fields.clone(), modified_at);
            article.clone()
        }))
    }

    async fn publish(
        &self,
        id: &ArticleId,
        now: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut state = self.store.write()?;
        Ok(state.articles.get_mut(id.as_uuid()).map(|article| {
            let _ = article.publish_at(now);
            article.clone()
        }))
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        let mut state = self.store.write()?;
        let removed = state.articles.remove(id.as_uuid()).is_some();
        if removed {
            // Mirror the schema's ON DELETE CASCADE.
            state
                .comments
                .retain(|comment| comment.article_id() != id);
            state
                .likes
                .retain(|(article, _), _| article != id.as_uuid());
        }
        Ok(removed)
    }

    async fn list_published(&self) -> Result<Vec<Article>, ArticlePersistenceError> {
        let state = self.store.read()?;
        let mut published: Vec<Article> = state
            .articles
            .values()
            .filter(|article| article.is_published())
            .cloned()
            .collect();
        published.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
        Ok(published)
    }

    async fn list_for_author(
        &self,
        author_id: &UserId,
    ) -> Result<AuthorShelf, ArticlePersistenceError> {
        let state = self.store.read()?;
        let mine: Vec<Article> = state
            .articles
            .values()
            .filter(|article| article.author_id() == author_id)
            .cloned()
            .collect();
        let (mut published, mut drafts): (Vec<Article>, Vec<Article>) =
            mine.into_iter().partition(Article::is_published);
        published.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
        drafts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(AuthorShelf { published, drafts })
    }
}

/// In-memory implementation of the engagement repository port.
#[derive(Clone)]
pub struct MemoryEngagementRepository {
    store: Arc<MemoryStore>,
}

impl MemoryEngagementRepository {
    /// Create a repository over the shared store.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl From<StorePoisoned> for EngagementPersistenceError {
    fn from(err: StorePoisoned) -> Self {
        Self::query(err.to_string())
    }
}

#[async_trait]
impl EngagementRepository for MemoryEngagementRepository {
    async fn insert_comment(
        &self,
        comment: &Comment,
    ) -> Result<(), EngagementPersistenceError> {
        let mut state = self.store.write()?;
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn comments_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<Comment>, EngagementPersistenceError> {
        let state = self.store.read()?;
        let mut comments: Vec<Comment> = state
            .comments
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
        now: DateTime<Utc>,
    ) -> Result<LikeOutcome, EngagementPersistenceError> {
        // One write lock spans the uniqueness check, the insert, and the
        // recount, which is this adapter's transaction.
        let mut state = self.store.write()?;
        if !state.articles.contains_key(article_id.as_uuid()) {
            return Err(EngagementPersistenceError::query(format!(
                "article {article_id} missing"
            )));
        }

        let key = (*article_id.as_uuid(), *user_id.as_uuid());
        let newly_liked = match state.likes.entry(key) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        };

        let like_count = state.like_count(article_id.as_uuid());
        if let Some(article) = state.articles.get_mut(article_id.as_uuid()) {
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
        let mut state = self.store.write()?;
        let like_count = state.like_count(article_id.as_uuid());
        if let Some(article) = state.articles.get_mut(article_id.as_uuid()) {
            article.set_like_count(like_count);
        }
        Ok(like_count)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for cascade deletes and like uniqueness.
    use super::*;
    use crate::domain::CommentContent;

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::default())
    }

    fn seed_article(store: &Arc<MemoryStore>, author: &UserId) -> Article {
        let fields = ArticleFields::try_from_parts("Hello", None, "World").expect("fields");
        let article = Article::draft(*author, fields, Utc::now());
        store
            .write()
            .expect("store lock")
            .articles
            .insert(*article.id().as_uuid(), article.clone());
        article
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let store = store();
        let repo = MemoryUserRepository::new(store);
        let first = User::try_from_parts(UserId::random(), "Ann", "ann@x.com").expect("user");
        let second =
            User::try_from_parts(UserId::random(), "Another", "ann@x.com").expect("user");

        repo.create(&first, "digest").await.expect("first insert");
        let err = repo
            .create(&second, "digest")
            .await
            .expect_err("duplicate email must fail");

        assert_eq!(err, UserPersistenceError::duplicate_email());
    }

    #[tokio::test]
    async fn likes_are_unique_per_article_and_user() {
        let store = store();
        let author = UserId::random();
        let reader = UserId::random();
        let article = seed_article(&store, &author);
        let repo = MemoryEngagementRepository::new(store.clone());

        let first = repo
            .like(article.id(), &reader, Utc::now())
            .await
            .expect("first like");
        let second = repo
            .like(article.id(), &reader, Utc::now())
            .await
            .expect("second like");

        assert!(first.newly_liked);
        assert!(!second.newly_liked);
        assert_eq!(second.like_count, 1);
        let stored = store
            .read()
            .expect("store lock")
            .articles
            .get(article.id().as_uuid())
            .cloned()
            .expect("article stored");
        assert_eq!(stored.like_count(), 1);
    }

    #[tokio::test]
    async fn deleting_an_article_cascades_to_comments_and_likes() {
        let store = store();
        let author = UserId::random();
        let article = seed_article(&store, &author);
        let articles = MemoryArticleRepository::new(store.clone());
        let engagement = MemoryEngagementRepository::new(store.clone());

        let content = CommentContent::new("nice").expect("content");
        engagement
            .insert_comment(&Comment::new(*article.id(), None, content, Utc::now()))
            .await
            .expect("comment");
        let _ = engagement
            .like(article.id(), &UserId::random(), Utc::now())
            .await
            .expect("like");

        let removed = articles.delete(article.id()).await.expect("delete");
        assert!(removed);

        let state = store.read().expect("store lock");
        assert!(state.comments.is_empty(), "comments must cascade");
        assert!(state.likes.is_empty(), "likes must cascade");
    }

    #[tokio::test]
    async fn publish_through_the_repository_is_first_wins() {
        let store = store();
        let author = UserId::random();
        let article = seed_article(&store, &author);
        let repo = MemoryArticleRepository::new(store);

        let first_time = Utc::now();
        let later = first_time + chrono::TimeDelta::hours(1);

        let first = repo
            .publish(article.id(), first_time)
            .await
            .expect("publish")
            .expect("article exists");
        let second = repo
            .publish(article.id(), later)
            .await
            .expect("publish")
            .expect("article exists");

        assert_eq!(first.published_at(), Some(first_time));
        assert_eq!(second.published_at(), Some(first_time));
    }
}
