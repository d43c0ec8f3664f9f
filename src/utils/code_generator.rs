//! Short code generation and validation utilities.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Random bytes drawn per generated code.
const CODE_LENGTH_BYTES: usize = 6;

/// Length of a generated code after encoding and truncation.
pub const GENERATED_CODE_LENGTH: usize = 6;

pub const CUSTOM_CODE_MIN_LENGTH: usize = 3;
pub const CUSTOM_CODE_MAX_LENGTH: usize = 32;

/// Codes that collide with route segments.
pub const RESERVED_CODES: &[&str] = &[
    "api",
    "auth",
    "admin",
    "health",
    "ping",
    "users",
    "shortener-link",
];

/// Generates a random short code.
///
/// Six bytes from the OS RNG, URL-safe base64 encoded and cut to
/// [`GENERATED_CODE_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system RNG is unavailable.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "System RNG unavailable");
        AppError::internal("Failed to generate short code", json!({}))
    })?;

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(GENERATED_CODE_LENGTH);
    Ok(code)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < CUSTOM_CODE_MIN_LENGTH || code.len() > CUSTOM_CODE_MAX_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 3-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.iter().any(|r| r.eq_ignore_ascii_case(code)) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
