//! Comment entity: an append-only note on an article.
//!
//! Comments are never edited or deleted individually; they disappear only
//! when their article is deleted (cascade). The authoring user is optional —
//! anonymous comments are permitted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::article::ArticleId;
use super::user::{User, UserId};

/// Validation errors raised by comment constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyContent,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "comment must not be empty"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Stable comment identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty comment content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CommentContent(String);

impl CommentContent {
    /// Validate and construct comment content.
    pub fn new(content: impl Into<String>) -> Result<Self, CommentValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Raw comment state as loaded from a store.
///
/// `author_name` is a read-time join against the users table; anonymous
/// comments and comments from since-deleted users carry `None`.
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub author_id: Option<UserId>,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A reader's comment on an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    article_id: ArticleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<String>,
    content: CommentContent,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment, optionally attributed to `author`.
    #[must_use]
    pub fn new(
        article_id: ArticleId,
        author: Option<&User>,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::random(),
            article_id,
            author_id: author.map(|user| *user.id()),
            author_name: author.map(|user| user.display_name().as_ref().to_owned()),
            content,
            created_at: now,
        }
    }

    /// Stable comment identifier.
    pub fn id(&self) -> &CommentId {
        &self.id
    }

    /// Article this comment belongs to.
    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    /// Identifier of the authoring user; `None` for anonymous comments.
    pub fn author_id(&self) -> Option<&UserId> {
        self.author_id.as_ref()
    }

    /// Display name of the authoring user at read time.
    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    /// Comment content.
    pub fn content(&self) -> &str {
        self.content.as_ref()
    }

    /// Creation timestamp; comments are returned oldest first.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl TryFrom<CommentRecord> for Comment {
    type Error = CommentValidationError;

    fn try_from(record: CommentRecord) -> Result<Self, Self::Error> {
        let CommentRecord {
            id,
            article_id,
            author_id,
            author_name,
            content,
            created_at,
        } = record;
        Ok(Self {
            id,
            article_id,
            author_id,
            author_name,
            content: CommentContent::new(content)?,
            created_at,
        })
    }
}
