//! Error types shared between the backend and its clients

use thiserror::Error;

/// HTTP status carried by every validation failure
pub const VALIDATION_STATUS: u16 = 400;

/// A request payload failed structural or content validation.
///
/// Validation errors are transient: they are returned to the caller and
/// never stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub status_code: u16,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: VALIDATION_STATUS,
        }
    }
}
