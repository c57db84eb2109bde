//! Post service

use crate::error::ApiError;
use crate::repositories::{NewPost, PostStore, StoreError};
use postboard_shared::{CreatePostRequest, CreatedPostResponse, PostResponse};
use tracing::debug;

pub struct PostService;

impl PostService {
    /// Create a post owned by `user_id`. The title is stored trimmed.
    pub async fn create<S: PostStore + ?Sized>(
        store: &S,
        user_id: i64,
        req: CreatePostRequest,
    ) -> Result<CreatedPostResponse, ApiError> {
        let post = store
            .create_post(NewPost {
                title: req.title.trim().to_string(),
                user_id,
            })
            .await
            .map_err(|err| match err {
                // Token outlived its account
                StoreError::ForeignKeyViolation(_) => {
                    ApiError::Unauthorized("Invalid or expired token".to_string())
                }
                other => other.into(),
            })?;

        debug!(post_id = post.id, user_id, "Post created");
        Ok(CreatedPostResponse {
            id: post.id,
            title: post.title,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    pub async fn list_for_user<S: PostStore + ?Sized>(
        store: &S,
        user_id: i64,
    ) -> Result<Vec<PostResponse>, ApiError> {
        let posts = store.list_posts_by_user(user_id).await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn list_all<S: PostStore + ?Sized>(
        store: &S,
    ) -> Result<Vec<PostResponse>, ApiError> {
        let posts = store.list_posts().await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryStore, NewUser, UserStore};

    async fn store_with_user() -> (InMemoryStore, i64) {
        let store = InMemoryStore::new();
        let user = store
            .create_user(NewUser {
                name: "Author".to_string(),
                email: "author@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        (store, user.id)
    }

    fn request(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_title() {
        let (store, user_id) = store_with_user().await;
        let post = PostService::create(&store, user_id, request("  Hello world  "))
            .await
            .unwrap();
        assert_eq!(post.title, "Hello world");
    }

    #[tokio::test]
    async fn test_create_for_missing_user_is_unauthorized() {
        let store = InMemoryStore::new();
        let err = PostService::create(&store, 99, request("Ghost")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_list_for_user_embeds_author() {
        let (store, user_id) = store_with_user().await;
        PostService::create(&store, user_id, request("One")).await.unwrap();
        PostService::create(&store, user_id, request("Two")).await.unwrap();

        let posts = PostService::list_for_user(&store, user_id).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.user.id == user_id && p.user.name == "Author"));

        assert!(PostService::list_for_user(&store, user_id + 1)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(PostService::list_all(&store).await.unwrap().len(), 2);
    }
}
