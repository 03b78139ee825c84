//! # wisdom-common
//!
//! Shared utilities including configuration, session token verification, and telemetry.

pub mod auth;
pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{AuthError, Claims, JwtService, UserMetadata, AUTHENTICATED_AUDIENCE};
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, JwtConfig, RankingConfig,
    RealtimeConfig, RedisConfig, StorageConfig,
};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
