//! Leaderboard watcher entry point
//!
//! Run with:
//! ```bash
//! cargo run -p wisdom-watch
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use tracing::{error, info};
use wisdom_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(app = %config.app.name, env = ?config.app.env, "Starting leaderboard watcher");

    if let Err(e) = wisdom_watch::run(config).await {
        error!(error = %e, "Watcher failed");
        std::process::exit(1);
    }
}
