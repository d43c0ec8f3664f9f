use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::User;
use crate::error::AppError;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Password hashing and access-token issuance.
#[cfg_attr(test, mockall::automock)]
pub trait Credentials: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, AppError>;

    /// Returns false for a wrong password or an unparsable hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    fn issue_token(&self, user: &User) -> Result<String, AppError>;

    /// Decodes and validates a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for malformed, forged or expired tokens.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError>;
}
