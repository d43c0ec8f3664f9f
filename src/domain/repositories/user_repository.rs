//! Repository trait for user accounts.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::error::AppError;
use crate::query::PredicateSet;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create_user(&self, user: User) -> Result<User, AppError>;

    /// Finds a live account by its unique email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists every mutable field of `user` and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account no longer exists.
    async fn update_user(&self, user: &User) -> Result<User, AppError>;

    async fn count_users(&self, spec: &PredicateSet) -> Result<i64, AppError>;

    async fn list_users(&self, spec: &PredicateSet) -> Result<Vec<User>, AppError>;
}
