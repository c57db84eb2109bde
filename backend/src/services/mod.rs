//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the stores and the auth primitives.

pub mod post;
pub mod user;

pub use post::PostService;
pub use user::UserService;
