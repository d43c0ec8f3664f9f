//! Argon2id password hashing and HS256 access tokens.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::json;

use crate::domain::entities::User;
use crate::domain::ports::{Claims, Credentials};
use crate::error::AppError;

pub struct Argon2JwtCredentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl Argon2JwtCredentials {
    pub fn new(jwt_secret: &str, token_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }
}

impl Credentials for Argon2JwtCredentials {
    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AppError::internal("Failed to hash password", json!({}))
            })
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": format!("Invalid token: {e}") }),
                )
            })
    }
}
