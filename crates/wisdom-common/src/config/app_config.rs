//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub ranking: RankingConfig,
    pub realtime: RealtimeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration (change notifications)
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Avatar storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_avatar_dir")]
    pub avatar_dir: String,
    #[serde(default = "default_avatar_public_url")]
    pub avatar_public_url: String,
    #[serde(default = "default_avatar_max_size_kb")]
    pub avatar_max_size_kb: u32,
}

impl StorageConfig {
    #[must_use]
    pub fn avatar_max_bytes(&self) -> usize {
        self.avatar_max_size_kb as usize * 1024
    }
}

/// Leaderboard query limits
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_ranking_limit")]
    pub default_limit: u32,
    #[serde(default = "default_ranking_max_limit")]
    pub max_limit: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_ranking_limit(),
            max_limit: default_ranking_max_limit(),
        }
    }
}

/// Realtime subscription settings
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of the in-process change broadcast channel
    #[serde(default = "default_realtime_buffer")]
    pub buffer: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            buffer: default_realtime_buffer(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "wisdom".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_avatar_dir() -> String {
    "./avatars".to_string()
}

fn default_avatar_public_url() -> String {
    "http://localhost:8080/avatars".to_string()
}

fn default_avatar_max_size_kb() -> u32 {
    2048
}

fn default_ranking_limit() -> u32 {
    50
}

fn default_ranking_max_limit() -> u32 {
    200
}

fn default_realtime_buffer() -> usize {
    256
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or a value fails to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingVar(key));

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: match lookup("APP_ENV") {
                    Some(value) => Environment::parse(&value)
                        .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
                    None => Environment::default(),
                },
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                max_connections: parse_or(&lookup, "REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                access_token_expiry: parse_or(&lookup, "JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            storage: StorageConfig {
                avatar_dir: lookup("AVATAR_DIR").unwrap_or_else(default_avatar_dir),
                avatar_public_url: lookup("AVATAR_PUBLIC_URL")
                    .unwrap_or_else(default_avatar_public_url),
                avatar_max_size_kb: parse_or(&lookup, "AVATAR_MAX_SIZE_KB", default_avatar_max_size_kb)?,
            },
            ranking: RankingConfig {
                default_limit: parse_or(&lookup, "RANKING_DEFAULT_LIMIT", default_ranking_limit)?,
                max_limit: parse_or(&lookup, "RANKING_MAX_LIMIT", default_ranking_max_limit)?,
            },
            realtime: RealtimeConfig {
                buffer: parse_or(&lookup, "REALTIME_BUFFER", default_realtime_buffer)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MIN_CONNECTIONS",
                "must not exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }
        if self.ranking.default_limit == 0 || self.ranking.default_limit > self.ranking.max_limit {
            return Err(ConfigError::InvalidValue(
                "RANKING_DEFAULT_LIMIT",
                "must be between 1 and RANKING_MAX_LIMIT".to_string(),
            ));
        }
        if self.realtime.buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "REALTIME_BUFFER",
                "must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
