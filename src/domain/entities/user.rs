//! User account entity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::query::Filterable;

/// Columns of `users` that list queries may reference.
///
/// Secrets (`password_hash`, `otp_hash`) are deliberately absent.
pub const USER_COLUMNS: &[&str] = &["id", "email", "role", "verified_at", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// HMAC digest of the pending one-time code; `None` once consumed.
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds an unverified account with a pending one-time code.
    pub fn new(
        email: String,
        password_hash: String,
        otp_hash: String,
        otp_expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role: Role::default(),
            otp_hash: Some(otp_hash),
            otp_expires_at: Some(otp_expires_at),
            verified_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true when the pending code has passed its expiry at `now`.
    pub fn otp_expired(&self, now: DateTime<Utc>) -> bool {
        self.otp_expires_at.is_none_or(|expires| now > expires)
    }

    /// Marks the account verified and clears the pending code.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.verified_at = Some(now);
        self.otp_hash = None;
        self.otp_expires_at = None;
        self.updated_at = now;
    }
}

impl Filterable for User {
    fn field(&self, column: &str) -> Option<String> {
        let ts = |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Micros, true);
        match column {
            "id" => Some(self.id.to_string()),
            "email" => Some(self.email.clone()),
            "role" => Some(self.role.to_string()),
            "verified_at" => self.verified_at.as_ref().map(ts),
            "created_at" => Some(ts(&self.created_at)),
            "updated_at" => Some(ts(&self.updated_at)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User::new(
            "alice@example.com".to_string(),
            "hash".to_string(),
            "otp".to_string(),
            Utc::now() + Duration::minutes(15),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_verified());
        assert!(!user.is_admin());
        assert!(user.otp_hash.is_some());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_otp_expiry() {
        let user = user();
        assert!(!user.otp_expired(Utc::now()));
        assert!(user.otp_expired(Utc::now() + Duration::minutes(16)));
    }

    #[test]
    fn test_mark_verified_clears_code() {
        let mut user = user();
        let now = Utc::now();
        user.mark_verified(now);

        assert_eq!(user.verified_at, Some(now));
        assert!(user.otp_hash.is_none());
        assert!(user.otp_expired(now));
    }

    #[test]
    fn test_secrets_are_not_filterable() {
        let user = user();
        assert!(user.field("password_hash").is_none());
        assert!(user.field("otp_hash").is_none());
        assert_eq!(user.field("role").as_deref(), Some("user"));
    }
}
