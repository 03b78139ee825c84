//! Redis change feed tests
//!
//! These tests require a running Redis server:
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"
//! cargo test -p integration-tests --test redis_feed_tests
//! ```

use integration_tests::*;
use wisdom_cache::{RedisChangeFeed, RedisPool, SubscriberBuilder};
use wisdom_common::RedisConfig;
use wisdom_core::events::{ChangeKind, Table, TableChange};
use wisdom_core::traits::ChangeFeed;
use wisdom_core::{PostId, UserId};

async fn connect(url: String) -> RedisChangeFeed {
    let config = RedisConfig {
        url,
        max_connections: 4,
    };
    let pool = RedisPool::from_config(&config).unwrap();
    pool.health_check().await.unwrap();
    let subscriber = SubscriberBuilder::new()
        .redis_config(&config)
        .build()
        .await
        .unwrap();
    RedisChangeFeed::new(pool, subscriber)
}

#[tokio::test]
async fn test_published_change_reaches_table_subscriber() {
    let Some(url) = redis_url() else {
        return;
    };
    let feed = connect(url).await;

    let mut posts = feed.subscribe(Table::Posts).await.unwrap();
    let mut reactions = feed.subscribe(Table::Reactions).await.unwrap();
    // Subscribing again to a held table is acknowledged at once
    let _again = feed.subscribe(Table::Posts).await.unwrap();

    let post_id = PostId::new(i64::from(u32::MAX) + unique_suffix() as i64);
    let change = TableChange::post(ChangeKind::Update, post_id);
    feed.publish(&change).await.unwrap();

    assert_eq!(next_change(&mut posts).await, Some(change));

    // Other tables only see their own rows
    let reaction = TableChange::reaction(ChangeKind::Insert, UserId::random(), post_id);
    feed.publish(&reaction).await.unwrap();
    assert_eq!(next_change(&mut reactions).await, Some(reaction));

    feed.shutdown().await.unwrap();
}
