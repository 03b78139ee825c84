//! Wiring of the PostgreSQL, Redis and filesystem adapters

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use wisdom_cache::{RedisChangeFeed, RedisPool, SubscriberBuilder};
use wisdom_common::{AppConfig, JwtService};
use wisdom_core::events::Table;
use wisdom_db::{
    apply_schema, create_pool, LocalAvatarStorage, PgDraftRepository, PgPostRepository,
    PgProfileRepository, PgReactionRepository, PoolConfig,
};
use wisdom_service::ServiceContext;

/// Connected engine plus the handles needed for shutdown
pub struct Engine {
    pub context: ServiceContext,
    pub feed: Arc<RedisChangeFeed>,
}

/// Connect every backend adapter and build the service context
pub async fn connect(config: &AppConfig) -> anyhow::Result<Engine> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .context("failed to connect to PostgreSQL")?;
    apply_schema(&pool)
        .await
        .context("failed to apply database schema")?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis).context("failed to create Redis pool")?;
    redis_pool
        .health_check()
        .await
        .context("Redis health check failed")?;
    let subscriber = SubscriberBuilder::new()
        .redis_config(&config.redis)
        .broadcast_buffer(config.realtime.buffer)
        .table(Table::Posts)
        .build()
        .await
        .context("failed to start Redis subscriber")?;
    let feed = Arc::new(RedisChangeFeed::new(redis_pool, subscriber));
    info!("Redis connection established");

    let storage = LocalAvatarStorage::new(
        &config.storage.avatar_dir,
        config.storage.avatar_public_url.as_str(),
    );
    let identity = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    let context = ServiceContext::builder()
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .draft_repo(Arc::new(PgDraftRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
        .profile_repo(Arc::new(PgProfileRepository::new(pool)))
        .change_feed(feed.clone())
        .avatar_storage(Arc::new(storage))
        .identity(Arc::new(identity))
        .ranking(config.ranking)
        .avatar_max_bytes(config.storage.avatar_max_bytes())
        .build()
        .context("failed to build service context")?;

    Ok(Engine { context, feed })
}
