//! # wisdom-db
//!
//! Data layer implementing the backend ports defined in `wisdom-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx (connection pool, models, mappers)
//! - An in-memory backend implementing every port, for tests and local runs
//! - Avatar object storage on the local filesystem
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wisdom_db::pool::{create_pool, PoolConfig};
//! use wisdom_db::repositories::PgPostRepository;
//! use wisdom_core::traits::PostRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     let posts = PgPostRepository::new(pool);
//!     let leaderboard = posts.find_ranked(10).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod storage;

// Re-export commonly used types
pub use memory::{InMemoryAvatarStorage, InMemoryBackend, InMemoryChangeFeed};
pub use pool::{apply_schema, create_pool, PgPool, PoolConfig};
pub use repositories::{
    PgDraftRepository, PgPostRepository, PgProfileRepository, PgReactionRepository,
};
pub use storage::LocalAvatarStorage;
