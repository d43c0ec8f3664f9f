//! Account registration, verification, login and listing.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::application::emails::{OTP_SUBJECT, OtpEmail};
use crate::domain::entities::{Role, User};
use crate::domain::ports::{Claims, Credentials, Notifier};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::query::{PaginationMeta, QueryParameters, apply_count_query, apply_query, compute_meta};
use crate::telemetry;
use crate::utils::otp::{OtpHasher, generate_otp};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Authentication use-case.
///
/// One-time codes are stored as keyed digests (see [`OtpHasher`]) and
/// passwords as Argon2id PHC strings via [`Credentials`].
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn Credentials>,
    notifier: Arc<dyn Notifier>,
    otp: OtpHasher,
    otp_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn Credentials>,
        notifier: Arc<dyn Notifier>,
        otp: OtpHasher,
        otp_ttl_minutes: i64,
    ) -> Self {
        Self {
            users,
            credentials,
            notifier,
            otp,
            otp_ttl: Duration::minutes(otp_ttl_minutes),
        }
    }

    /// Registers a new unverified account and emails a one-time code.
    ///
    /// Email delivery failures are logged; the account is still created.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let password_hash = self.credentials.hash_password(password)?;
        let code = generate_otp();
        let user = User::new(
            email,
            password_hash,
            self.otp.hash(&code),
            Utc::now() + self.otp_ttl,
        );

        let user = self.users.create_user(user).await?;
        telemetry::record_registration();
        tracing::info!(user_id = %user.id, "User registered");

        self.send_otp(&user.email, &code).await;

        Ok(user)
    }

    /// Confirms an account with its one-time code.
    ///
    /// The code is checked before its expiry, and cleared on success.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown email
    /// - [`AppError::Validation`] for a wrong, consumed or expired code
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<User, AppError> {
        let mut user = self.find_by_email(email).await?;

        let matches = user
            .otp_hash
            .as_deref()
            .is_some_and(|digest| self.otp.verify(code.trim(), digest));
        if !matches {
            return Err(AppError::bad_request("invalid OTP code", json!({})));
        }

        let now = Utc::now();
        if user.otp_expired(now) {
            return Err(AppError::bad_request("OTP code is expired", json!({})));
        }

        user.mark_verified(now);
        let user = self.users.update_user(&user).await?;
        tracing::info!(user_id = %user.id, "User verified");

        Ok(user)
    }

    /// Issues a fresh one-time code for an unverified account.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown email
    /// - [`AppError::Conflict`] if the account is already verified
    pub async fn resend_otp(&self, email: &str) -> Result<User, AppError> {
        let mut user = self.find_by_email(email).await?;

        if user.is_verified() {
            return Err(AppError::conflict(
                "Account is already verified",
                json!({ "email": user.email }),
            ));
        }

        let code = generate_otp();
        user.otp_hash = Some(self.otp.hash(&code));
        user.otp_expires_at = Some(Utc::now() + self.otp_ttl);
        let user = self.users.update_user(&user).await?;

        self.send_otp(&user.email, &code).await;

        Ok(user)
    }

    /// Checks credentials and returns the account with a signed access token.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for an unknown email or wrong password
    /// - [`AppError::Forbidden`] if the account is not verified yet
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        };

        if !self.credentials.verify_password(password, &user.password_hash) {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        }

        if !user.is_verified() {
            return Err(AppError::forbidden(
                "Account is not verified",
                json!({ "email": user.email }),
            ));
        }

        let token = self.credentials.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    /// Validates a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<Claims, AppError> {
        self.credentials.decode_token(token)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": user_id })))
    }

    /// Lists accounts for validated query parameters.
    ///
    /// The page and the total count are fetched concurrently; either failing
    /// fails the whole listing.
    pub async fn list_users(
        &self,
        params: &QueryParameters,
    ) -> Result<(Vec<User>, PaginationMeta), AppError> {
        let page_spec = apply_query(params);
        let count_spec = apply_count_query(params);

        let (users, total) = tokio::try_join!(
            self.users.list_users(&page_spec),
            self.users.count_users(&count_spec),
        )?;

        Ok((users, compute_meta(params, total)))
    }

    /// Grants the admin role.
    pub async fn promote(&self, email: &str) -> Result<User, AppError> {
        let mut user = self.find_by_email(email).await?;
        user.role = Role::Admin;
        self.users.update_user(&user).await
    }

    /// Marks an account verified without a code.
    pub async fn force_verify(&self, email: &str) -> Result<User, AppError> {
        let mut user = self.find_by_email(email).await?;
        if !user.is_verified() {
            user.mark_verified(Utc::now());
        }
        self.users.update_user(&user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        self.users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "email": email })))
    }

    async fn send_otp(&self, email: &str, code: &str) {
        let rendered = OtpEmail {
            email,
            code,
            ttl_minutes: self.otp_ttl.num_minutes(),
        }
        .body();

        let result = match rendered {
            Ok(body) => self.notifier.send_message(email, OTP_SUBJECT, &body).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            telemetry::record_otp_email_failure();
            tracing::error!(email, error = %e, "Failed to send OTP email");
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
