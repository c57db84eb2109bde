//! User service for authentication and user management
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, StoreError, UserStore};
use postboard_shared::{LoginRequest, LoginResponse, SignupRequest, UserResponse};
use tracing::info;

const EMAIL_TAKEN: &str = "Email already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new account
    pub async fn signup<S: UserStore + ?Sized>(
        store: &S,
        req: SignupRequest,
    ) -> Result<UserResponse, ApiError> {
        if store.find_user_by_email(&req.email).await?.is_some() {
            return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let user = Self::insert(store, req)
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent signup for the same email
                ApiError::Conflict(_) => ApiError::Conflict(EMAIL_TAKEN.to_string()),
                other => other,
            })?;

        info!(user_id = user.id, "User signed up");
        Ok(user)
    }

    /// Exchange credentials for a token.
    ///
    /// Unknown email and wrong password fail with the same message.
    pub async fn login<S: UserStore + ?Sized>(
        store: &S,
        jwt: &JwtService,
        req: LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        let user = store
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;
        if !valid {
            return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let token = jwt.issue(user.id).map_err(ApiError::Internal)?;
        info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            user: user.into(),
            token,
        })
    }

    /// Create a user through the users resource.
    ///
    /// A taken email surfaces as the store's unique violation.
    pub async fn create_user<S: UserStore + ?Sized>(
        store: &S,
        req: SignupRequest,
    ) -> Result<UserResponse, ApiError> {
        Self::insert(store, req).await
    }

    pub async fn list_users<S: UserStore + ?Sized>(
        store: &S,
    ) -> Result<Vec<UserResponse>, ApiError> {
        let users = store.list_users().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn insert<S: UserStore + ?Sized>(
        store: &S,
        req: SignupRequest,
    ) -> Result<UserResponse, ApiError> {
        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = store
            .create_user(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(msg) => ApiError::Conflict(msg),
                other => other.into(),
            })?;

        Ok(user.into())
    }
}
