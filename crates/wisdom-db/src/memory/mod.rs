//! In-memory implementations of every backend port
//!
//! Used by tests and local development in place of PostgreSQL, Redis and
//! the avatar bucket.

mod avatar_storage;
mod backend;
mod change_feed;

pub use avatar_storage::{InMemoryAvatarStorage, StoredObject};
pub use backend::InMemoryBackend;
pub use change_feed::InMemoryChangeFeed;
