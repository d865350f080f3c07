//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Registered accounts with their credential digests.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email, compared byte-exactly.
        email -> Varchar,
        /// Human-readable display name (max 64 characters).
        display_name -> Varchar,
        /// Argon2 PHC digest of the account password.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Articles in draft or published state.
    articles (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning author; deleting the author cascades here.
        author_id -> Uuid,
        title -> Varchar,
        subtitle -> Nullable<Varchar>,
        body -> Text,
        created_at -> Timestamptz,
        modified_at -> Timestamptz,
        /// Null while the article is a draft; set exactly once on publish.
        published_at -> Nullable<Timestamptz>,
        /// Denormalised count of rows in `likes` for this article.
        like_count -> Int8,
    }
}

diesel::table! {
    /// Append-only comment log; rows vanish only with their article.
    comments (id) {
        id -> Uuid,
        article_id -> Uuid,
        /// Null for anonymous comments and after author deletion.
        user_id -> Nullable<Uuid>,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Like facts keyed by the unique (article, user) pair.
    likes (article_id, user_id) {
        article_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(articles -> users (author_id));
diesel::joinable!(comments -> articles (article_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(likes -> articles (article_id));
diesel::joinable!(likes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, articles, comments, likes);
