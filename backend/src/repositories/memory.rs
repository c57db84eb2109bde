//! In-process store
//!
//! Mirrors the constraints of the SQL schema: unique emails, posts must
//! reference an existing user, ids are assigned sequentially from 1.

use super::{
    NewPost, NewUser, PostRecord, PostStore, PostWithAuthorRecord, Store, StoreError, StoreResult,
    UserRecord, UserStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRecord>,
    posts: Vec<PostRecord>,
}

impl Tables {
    fn user(&self, id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    fn with_author(&self, post: &PostRecord) -> Option<PostWithAuthorRecord> {
        self.user(post.user_id).map(|author| PostWithAuthorRecord {
            id: post.id,
            title: post.title.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            author_id: author.id,
            author_name: author.name.clone(),
            author_email: author.email.clone(),
        })
    }
}

/// Store held entirely in memory.
///
/// Intended for tests and local development; data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        Ok(self.read()?.user(id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.read()?.users.clone())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::UniqueViolation(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            ));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: tables.users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        let mut tables = self.write()?;
        if tables.user(post.user_id).is_none() {
            return Err(StoreError::ForeignKeyViolation(format!(
                "user {} does not exist",
                post.user_id
            )));
        }

        let now = Utc::now();
        let record = PostRecord {
            id: tables.posts.len() as i64 + 1,
            title: post.title,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(record.clone());
        Ok(record)
    }

    async fn list_posts_by_user(&self, user_id: i64) -> StoreResult<Vec<PostWithAuthorRecord>> {
        let tables = self.read()?;
        Ok(tables
            .posts
            .iter()
            .filter(|post| post.user_id == user_id)
            .filter_map(|post| tables.with_author(post))
            .collect())
    }

    async fn list_posts(&self) -> StoreResult<Vec<PostWithAuthorRecord>> {
        let tables = self.read()?;
        Ok(tables
            .posts
            .iter()
            .filter_map(|post| tables.with_author(post))
            .collect())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
