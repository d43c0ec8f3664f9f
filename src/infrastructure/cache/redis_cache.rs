//! Redis-backed redirect cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "shortlink:";

/// Redis cache for code to URL lookups.
///
/// Shares one `ConnectionManager` across requests. Operations are fail-open.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects, checks the connection with `PING`, and sets the default TTL
    /// (`CACHE_TTL_SECONDS`).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the server is
    /// unreachable, or `PING` fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {e}")))?;

        let mut probe = manager.clone();
        probe
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn key(short_code: &str) -> String {
        format!("{KEY_PREFIX}{short_code}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_destination(&self, short_code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(Self::key(short_code)).await {
            Ok(hit) => {
                debug!(short_code, hit = hit.is_some(), "Cache lookup");
                Ok(hit)
            }
            Err(e) => {
                warn!(short_code, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_destination(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::key(short_code), original_url, ttl)
            .await
        {
            warn!(short_code, error = %e, "Redis SET failed");
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
