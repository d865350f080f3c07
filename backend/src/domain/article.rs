//! Article aggregate and its draft/published lifecycle.
//!
//! An article starts life as a draft (`published_at` is `None`) and moves to
//! the published state exactly once; there is no reverse transition. The
//! `like_count` field is a denormalised projection of the likes relation and
//! is only ever written from a recount of that relation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Validation errors raised by article constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    NegativeLikeCount,
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::NegativeLikeCount => write!(f, "like count must not be negative"),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Stable article identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
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

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum stored title length.
pub const TITLE_MAX: usize = 200;

/// Author-editable article content: title, optional subtitle, body.
///
/// An empty subtitle collapses to `None`; the body may be empty (authors save
/// skeleton drafts). Shared by draft creation and editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFields {
    title: String,
    subtitle: Option<String>,
    body: String,
}

impl ArticleFields {
    /// Validate and construct article content fields.
    pub fn try_from_parts(
        title: &str,
        subtitle: Option<&str>,
        body: &str,
    ) -> Result<Self, ArticleValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let subtitle = subtitle
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);
        Ok(Self {
            title: title.to_owned(),
            subtitle,
            body: body.to_owned(),
        })
    }

    /// Article headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional subheading.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Article body content.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Raw article state as loaded from a store, validated into an [`Article`].
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub id: ArticleId,
    pub author_id: UserId,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub like_count: i64,
}

/// Blog article owned by a single author.
///
/// ## Invariants
/// - `published_at`, once set, never changes (first publish wins).
/// - `like_count` equals the number of distinct `(article, user)` likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    id: ArticleId,
    author_id: UserId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    body: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
    like_count: i64,
}

impl Article {
    /// Create a brand-new draft owned by `author_id`.
    ///
    /// `created_at` and `modified_at` both start at `now`; the article has no
    /// publication timestamp and no likes.
    #[must_use]
    pub fn draft(author_id: UserId, fields: ArticleFields, now: DateTime<Utc>) -> Self {
        let ArticleFields {
            title,
            subtitle,
            body,
        } = fields;
        Self {
            id: ArticleId::random(),
            author_id,
            title,
            subtitle,
            body,
            created_at: now,
            modified_at: now,
            published_at: None,
            like_count: 0,
        }
    }

    /// Stable article identifier.
    pub fn id(&self) -> &ArticleId {
        &self.id
    }

    /// Identifier of the owning author.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Article headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional subheading.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Article body content.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the most recent edit.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Publication timestamp; `None` while the article is a draft.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Derived number of likes.
    pub fn like_count(&self) -> i64 {
        self.like_count
    }

    /// Whether the article is visible to readers.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Replace the editable content and refresh `modified_at`.
    ///
    /// Editing is permitted in any lifecycle state; ownership is the caller's
    /// responsibility.
    pub(crate) fn apply_fields(&mut self, fields: ArticleFields, now: DateTime<Utc>) {
        let ArticleFields {
            title,
            subtitle,
            body,
        } = fields;
        self.title = title;
        self.subtitle = subtitle;
        self.body = body;
        self.modified_at = now;
    }

    /// Transition to the published state, returning the effective timestamp.
    ///
    /// The first publish sets `published_at = now`; repeat calls are no-ops
    /// that return the original timestamp, guarding against double-submit.
    pub(crate) fn publish_at(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        *self.published_at.get_or_insert(now)
    }

    /// Overwrite the derived like counter with a recount of the likes relation.
    pub(crate) fn set_like_count(&mut self, like_count: i64) {
        self.like_count = like_count;
    }
}

impl TryFrom<ArticleRecord> for Article {
    type Error = ArticleValidationError;

    fn try_from(record: ArticleRecord) -> Result<Self, Self::Error> {
        let ArticleRecord {
            id,
            author_id,
            title,
            subtitle,
            body,
            created_at,
            modified_at,
            published_at,
            like_count,
        } = record;
        if title.trim().is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if like_count < 0 {
            return Err(ArticleValidationError::NegativeLikeCount);
        }
        Ok(Self {
            id,
            author_id,
            title,
            subtitle,
            body,
            created_at,
            modified_at,
            published_at,
            like_count,
        })
    }
}

/// Author dashboard listing, partitioned by publication state.
///
/// `published` is ordered by `published_at` descending, `drafts` by
/// `created_at` descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorShelf {
    pub published: Vec<Article>,
    pub drafts: Vec<Article>,
}
