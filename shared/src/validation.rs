//! Input validation functions
//!
//! Validators operate on the raw JSON payload rather than on typed request
//! structs so that a missing field, an explicit `null` and an empty string
//! can all be reported the same way. Each validator returns the first
//! failure it finds.

use crate::errors::ValidationError;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// Minimum accepted password length, in characters
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum accepted password length, in characters
pub const PASSWORD_MAX_LEN: usize = 128;

static EMAIL_REGEX: Lazy<regex_lite::Regex> = Lazy::new(|| {
    regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A JSON object payload as received from a client
pub type Payload = Map<String, Value>;

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Check that every name in `required` is present and non-empty.
///
/// All missing names are reported together, in the order supplied.
pub fn validate_required(fields: &Payload, required: &[&str]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| is_missing(fields.get(*name)))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let verb = if missing.len() == 1 { "is" } else { "are" };
    Err(ValidationError::new(format!(
        "{} {} required",
        missing.join(", "),
        verb
    )))
}

/// Validate email format
pub fn validate_email(value: Option<&Value>) -> Result<(), ValidationError> {
    let email = non_empty_str(value).ok_or_else(|| ValidationError::new("Email is required"))?;

    if !EMAIL_REGEX.is_match(email.trim()) {
        return Err(ValidationError::new("Invalid email format"));
    }
    Ok(())
}

/// Validate password length bounds
pub fn validate_password(value: Option<&Value>) -> Result<(), ValidationError> {
    let password =
        non_empty_str(value).ok_or_else(|| ValidationError::new("Password is required"))?;

    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(ValidationError::new(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters long"
        )));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(ValidationError::new(format!(
            "Password must be less than {PASSWORD_MAX_LEN} characters long"
        )));
    }
    Ok(())
}

/// Validate a post title. Whitespace-only titles count as missing.
pub fn validate_title(value: Option<&Value>) -> Result<(), ValidationError> {
    match value.and_then(Value::as_str) {
        Some(title) if !title.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::new("Title is required")),
    }
}

/// Validate a signup payload: required fields, then email, then password.
pub fn validate_signup_data(payload: &Payload) -> Result<(), ValidationError> {
    validate_required(payload, &["name", "email", "password"])?;
    validate_email(payload.get("email"))?;
    validate_password(payload.get("password"))?;
    Ok(())
}

/// Validate a login payload: required fields, then email format.
///
/// Password strength is deliberately not checked here; a wrong password is
/// reported by the credential check, not by validation.
pub fn validate_login_data(payload: &Payload) -> Result<(), ValidationError> {
    validate_required(payload, &["email", "password"])?;
    validate_email(payload.get("email"))?;
    Ok(())
}

/// Validate a user payload submitted to the users resource.
pub fn validate_user_data(payload: &Payload) -> Result<(), ValidationError> {
    validate_signup_data(payload)
}
