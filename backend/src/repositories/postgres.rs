//! PostgreSQL-backed store

use super::{
    NewPost, NewUser, PostRecord, PostStore, PostWithAuthorRecord, Store, StoreError, StoreResult,
    UserRecord, UserStore,
};
use async_trait::async_trait;
use sqlx::PgPool;

const POST_WITH_AUTHOR_COLUMNS: &str = r#"
    SELECT p.id, p.title, p.created_at, p.updated_at,
           u.id AS author_id, u.name AS author_name, u.email AS author_email
    FROM posts p
    INNER JOIN users u ON u.id = p.user_id
"#;

/// Store on a shared `sqlx` connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate constraint violations into their store-level meaning
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return StoreError::UniqueViolation(db_err.message().to_string()),
            Some("23503") => return StoreError::ForeignKeyViolation(db_err.message().to_string()),
            _ => {}
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (title, user_id)
            VALUES ($1, $2)
            RETURNING id, title, user_id, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(post.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_posts_by_user(&self, user_id: i64) -> StoreResult<Vec<PostWithAuthorRecord>> {
        let query = format!("{POST_WITH_AUTHOR_COLUMNS} WHERE p.user_id = $1 ORDER BY p.id");
        sqlx::query_as::<_, PostWithAuthorRecord>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_posts(&self) -> StoreResult<Vec<PostWithAuthorRecord>> {
        let query = format!("{POST_WITH_AUTHOR_COLUMNS} ORDER BY p.id");
        sqlx::query_as::<_, PostWithAuthorRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
