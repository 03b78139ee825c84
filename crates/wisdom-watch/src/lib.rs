//! # wisdom-watch
//!
//! Headless leaderboard watcher: connects the production adapters and logs
//! every ranking snapshot.

pub mod bootstrap;
pub mod watcher;

pub use bootstrap::{connect, Engine};
pub use watcher::{log_snapshot, watch};

use wisdom_common::AppConfig;

/// Connect and watch until Ctrl-C
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let engine = connect(&config).await?;
    watch(engine).await
}
