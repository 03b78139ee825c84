//! Ranking view tests
//!
//! Run with: cargo test -p integration-tests --test ranking_tests

use std::sync::{Arc, Mutex};

use integration_tests::*;
use wisdom_common::RankingConfig;
use wisdom_core::entities::RankingEntry;
use wisdom_core::{ErrorKind, ReactionType, UserId, DEFAULT_DISPLAY_NAME};
use wisdom_service::{RankingView, ReactionLedger};

fn ids(entries: &[RankingEntry]) -> Vec<i64> {
    entries.iter().map(|e| e.post.id.into_inner()).collect()
}

type Snapshots = Arc<Mutex<Vec<Vec<RankingEntry>>>>;

fn recorder() -> (Snapshots, impl Fn(Vec<RankingEntry>) + Send + Sync + 'static) {
    let snapshots: Snapshots = Arc::default();
    let sink = snapshots.clone();
    (snapshots, move |entries: Vec<RankingEntry>| {
        sink.lock().unwrap().push(entries);
    })
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_ranking_order_and_tie_breaks() {
    let engine = TestEngine::new();
    // (honor, recommend, respect, hug), minutes after base
    engine.put_post(1, (0, 3, 5, 3), 0);
    engine.put_post(2, (1, 0, 0, 0), 50);
    engine.put_post(3, (0, 3, 4, 0), 10);
    engine.put_post(4, (0, 3, 5, 0), 20);
    engine.put_post(5, (0, 0, 0, 9), 5);
    engine.put_post(6, (0, 0, 0, 0), 5);

    let entries = RankingView::new(&engine.ctx).get_rankings(10).await.unwrap();

    // Hug never affects order; identical keys fall back to created_at then id
    assert_eq!(ids(&entries), vec![2, 1, 4, 3, 5, 6]);
    let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_rankings_are_deterministic() {
    let engine = TestEngine::new();
    for id in 1..=8 {
        // Many identical keys and timestamps
        engine.put_post(id, (id % 2, 1, 0, id), 0);
    }
    let view = RankingView::new(&engine.ctx);

    let first = view.get_rankings(50).await.unwrap();
    let second = view.get_rankings(50).await.unwrap();
    assert_eq!(first, second);

    let mut ranks: Vec<u32> = first.iter().map(|e| e.rank).collect();
    ranks.dedup();
    assert_eq!(ranks.len(), 8, "no two posts share a rank");
}

// ============================================================================
// Limits
// ============================================================================

#[tokio::test]
async fn test_zero_limit_rejected() {
    let engine = TestEngine::new();
    assert_kind(
        RankingView::new(&engine.ctx).get_rankings(0).await,
        ErrorKind::ValidationFailed,
    );
}

#[tokio::test]
async fn test_limit_clamped_to_configured_maximum() {
    let engine = TestEngine::with_ranking(RankingConfig {
        default_limit: 2,
        max_limit: 3,
    });
    for id in 1..=5 {
        engine.put_post(id, (0, 0, id, 0), 0);
    }
    let view = RankingView::new(&engine.ctx);

    assert_eq!(view.get_rankings(1000).await.unwrap().len(), 3);
    assert_eq!(ids(&view.get_default_rankings().await.unwrap()), vec![5, 4]);
}

// ============================================================================
// Author join
// ============================================================================

#[tokio::test]
async fn test_entries_carry_author_display_data() {
    let engine = TestEngine::new();
    let author = UserId::random();
    let token = engine.token_for(author, "Choi Yuna");
    engine.ctx.sessions().sign_in(&token).await.unwrap();
    let post = engine.create_post(author).await;
    engine.put_post(post.id.into_inner() + 1, (0, 0, 0, 0), 0);

    let entries = RankingView::new(&engine.ctx).get_rankings(10).await.unwrap();
    let mine = entries.iter().find(|e| e.post.id == post.id).unwrap();
    assert_eq!(mine.author.display_name, "Choi Yuna");

    let orphan = entries.iter().find(|e| e.post.id != post.id).unwrap();
    assert_eq!(orphan.author.display_name, DEFAULT_DISPLAY_NAME);
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_subscriber_receives_refreshed_rankings() {
    let engine = TestEngine::new();
    let posts = engine.create_posts(2).await;
    let user = engine.new_user().await;
    let (snapshots, callback) = recorder();

    let subscription = RankingView::new(&engine.ctx)
        .subscribe(10, callback)
        .await
        .unwrap();
    assert!(subscription.is_active());

    ReactionLedger::new(&engine.ctx)
        .send_reaction(user, posts[1].id, ReactionType::Honor)
        .await
        .unwrap();

    assert!(eventually(|| !snapshots.lock().unwrap().is_empty()).await);
    let latest = snapshots.lock().unwrap().last().cloned().unwrap();
    assert_eq!(latest[0].post.id, posts[1].id);
    assert_eq!(latest[0].post.counts.honor, 1);
    assert_eq!(latest[0].rank, 1);

    subscription.close().await;
}

#[tokio::test]
async fn test_each_subscriber_gets_its_own_snapshot() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let view = RankingView::new(&engine.ctx);
    let (first, first_cb) = recorder();
    let (second, second_cb) = recorder();

    let a = view.subscribe(10, first_cb).await.unwrap();
    let b = view.subscribe(1, second_cb).await.unwrap();

    ReactionLedger::new(&engine.ctx)
        .send_reaction(user, post.id, ReactionType::Respect)
        .await
        .unwrap();

    assert!(eventually(|| !first.lock().unwrap().is_empty()).await);
    assert!(eventually(|| !second.lock().unwrap().is_empty()).await);
    assert_eq!(first.lock().unwrap()[0][0].post.counts.respect, 1);
    assert_eq!(second.lock().unwrap()[0].len(), 1);

    a.close().await;
    b.close().await;
}

#[tokio::test]
async fn test_unsubscribe_stops_callbacks() {
    let engine = TestEngine::new();
    let posts = engine.create_posts(2).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);
    let (snapshots, callback) = recorder();

    let mut subscription = RankingView::new(&engine.ctx)
        .subscribe(10, callback)
        .await
        .unwrap();
    subscription.unsubscribe();
    assert!(!subscription.is_active());

    ledger
        .send_reaction(user, posts[0].id, ReactionType::Hug)
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(snapshots.lock().unwrap().is_empty());

    // Dropping a live handle unsubscribes as well
    let (dropped, callback) = recorder();
    let handle = RankingView::new(&engine.ctx)
        .subscribe(10, callback)
        .await
        .unwrap();
    drop(handle);
    ledger
        .send_reaction(user, posts[1].id, ReactionType::Hug)
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(dropped.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_subscribe_rejects_zero_limit() {
    let engine = TestEngine::new();
    let (_, callback) = recorder();
    let result = RankingView::new(&engine.ctx).subscribe(0, callback).await;
    assert!(result.is_err());
}
