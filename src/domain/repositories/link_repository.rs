//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use crate::query::PredicateSet;
use async_trait::async_trait;

/// Repository interface for shortened links.
///
/// Listing methods take a [`PredicateSet`] produced by the query applier;
/// implementations must honour every predicate, the ordering and the window.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a live (not soft-deleted) link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Counts links matching the predicates. Ordering and window are ignored.
    async fn count_matching(&self, spec: &PredicateSet) -> Result<i64, AppError>;

    /// Returns one page of links matching `spec`.
    async fn list_matching(&self, spec: &PredicateSet) -> Result<Vec<Link>, AppError>;

    /// Round-trips to the backing store; used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
