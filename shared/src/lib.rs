//! Postboard Shared Library
//!
//! Request/response types and payload validation shared by the backend and
//! any client of the API.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
