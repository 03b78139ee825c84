//! # wisdom-cache
//!
//! Redis transport for table change notifications.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: One channel per table, shared across engine instances
//! - **Change Feed**: `ChangeFeed` implementation over the two
//!
//! ## Example
//!
//! ```ignore
//! use wisdom_cache::{RedisChangeFeed, RedisPool, SubscriberBuilder};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let subscriber = SubscriberBuilder::new().redis_config(&config.redis).build().await?;
//! let feed = RedisChangeFeed::new(pool, subscriber);
//!
//! let mut posts = feed.subscribe(Table::Posts).await?;
//! while let Some(change) = posts.next().await { /* refresh */ }
//! ```

pub mod feed;
pub mod pool;
pub mod pubsub;

pub use feed::RedisChangeFeed;

pub use pool::{RedisPool, RedisPoolError, RedisResult};

pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, Subscriber, SubscriberBuilder, SubscriberConfig,
    SubscriberError, SubscriberResult, TABLE_CHANNEL_PREFIX,
};
