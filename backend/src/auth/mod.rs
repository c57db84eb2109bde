//! Authentication module
//!
//! Provides JWT-based authentication with argon2 password hashing.

pub mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, Identity, InvalidToken, JwtService};
pub use middleware::{authenticate, with_auth};
pub use password::PasswordService;
