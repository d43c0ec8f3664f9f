//! Cache service trait and error types.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache operation error: {0}")]
    Operation(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Code to destination URL cache used by redirects.
///
/// Implementations are fail-open: backend failures are logged and reported as
/// misses so that lookups degrade to the database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// `Ok(None)` on a miss or on backend error.
    async fn get_destination(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping; `ttl_seconds = None` uses the implementation default.
    async fn set_destination(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Reports backend reachability for `/health`.
    async fn health_check(&self) -> bool;

    /// Name shown in health output.
    fn backend(&self) -> &'static str;
}
