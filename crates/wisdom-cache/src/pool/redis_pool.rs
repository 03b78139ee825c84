//! Pooled Redis connections for publishing change notifications.
//!
//! Subscriptions hold their own dedicated connection; this pool only serves
//! short PUBLISH and PING round trips.

use deadpool_redis::{Config, Connection, Pool, Runtime};
use wisdom_common::RedisConfig;
use wisdom_core::DomainError;

/// Error type for Redis pool operations
#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Invalid Redis pool settings: {0}")]
    Settings(String),

    #[error("No Redis connection available: {0}")]
    Checkout(#[from] deadpool_redis::PoolError),

    #[error("Redis command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("Change payload could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Unexpected PING reply: {0}")]
    Ping(String),
}

impl From<RedisPoolError> for DomainError {
    fn from(e: RedisPoolError) -> Self {
        match e {
            RedisPoolError::Settings(_) | RedisPoolError::Encode(_) => {
                DomainError::ServerFailure(e.to_string())
            }
            RedisPoolError::Checkout(_) | RedisPoolError::Command(_) | RedisPoolError::Ping(_) => {
                DomainError::NetworkFailure(e.to_string())
            }
        }
    }
}

/// Result type for Redis pool operations
pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Hide credentials in a Redis URL before it is logged
fn redact(url: &str) -> String {
    match (url.split_once("://"), url.rsplit_once('@')) {
        (Some((scheme, _)), Some((_, host))) => format!("{scheme}://***@{host}"),
        _ => url.to_string(),
    }
}

/// Publishing connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    pub fn new(url: &str, max_connections: usize) -> RedisResult<Self> {
        let pool = Config::from_url(url)
            .builder()
            .map_err(|e| RedisPoolError::Settings(e.to_string()))?
            .max_size(max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::Settings(e.to_string()))?;

        tracing::info!(url = %redact(url), max_connections, "Redis pool created");
        Ok(Self { pool })
    }

    pub fn from_config(config: &RedisConfig) -> RedisResult<Self> {
        Self::new(&config.url, config.max_connections as usize)
    }

    pub async fn get(&self) -> RedisResult<Connection> {
        Ok(self.pool.get().await?)
    }

    /// Round-trip a PING; run once at startup before the feed is wired
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(RedisPoolError::Ping(reply))
        }
    }
}
