//! Persistence layer
//!
//! Handlers and services only see the [`UserStore`] and [`PostStore`]
//! traits. [`PgStore`] backs them with PostgreSQL, [`InMemoryStore`] with
//! process memory for tests and local development.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postboard_shared::{PostAuthor, PostResponse, UserResponse};
use thiserror::Error;

/// User record from the store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for inserting a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Post record from the store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub user_id: i64,
}

/// Post joined with its author
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthorRecord {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
}

impl From<PostWithAuthorRecord> for PostResponse {
    fn from(post: PostWithAuthorRecord) -> Self {
        Self {
            id: post.id,
            title: post.title,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user: PostAuthor {
                id: post.author_id,
                name: post.author_name,
                email: post.author_email,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    UniqueViolation(String),

    #[error("{0}")]
    ForeignKeyViolation(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>>;

    /// All users, oldest first
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;

    /// Insert a user. Fails with [`StoreError::UniqueViolation`] when the
    /// email is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post. Fails with [`StoreError::ForeignKeyViolation`] when the
    /// author does not exist.
    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord>;

    /// Posts written by `user_id`, oldest first
    async fn list_posts_by_user(&self, user_id: i64) -> StoreResult<Vec<PostWithAuthorRecord>>;

    /// Every post, oldest first
    async fn list_posts(&self) -> StoreResult<Vec<PostWithAuthorRecord>>;
}

/// Everything the application needs from persistence
#[async_trait]
pub trait Store: UserStore + PostStore {
    async fn health_check(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_drops_password_hash() {
        let now = Utc::now();
        let record = UserRecord {
            id: 3,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(record)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_post_response_embeds_author() {
        let now = Utc::now();
        let record = PostWithAuthorRecord {
            id: 1,
            title: "Hello".to_string(),
            created_at: now,
            updated_at: now,
            author_id: 7,
            author_name: "Ada".to_string(),
            author_email: "ada@example.com".to_string(),
        };

        let post = PostResponse::from(record);
        assert_eq!(post.user.id, 7);
        assert_eq!(post.user.name, "Ada");
        assert_eq!(post.title, "Hello");
    }
}
