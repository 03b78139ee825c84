//! Reaction ledger and aggregate counter tests
//!
//! Run with: cargo test -p integration-tests --test reaction_tests

use integration_tests::*;
use wisdom_core::entities::ReactionChange;
use wisdom_core::events::{ChangeKind, Table};
use wisdom_core::traits::{PostRepository, ReactionRepository};
use wisdom_core::{ErrorKind, PostId, ReactionType, UserId, TOTAL_REACTION_LIMIT};
use wisdom_service::{PostService, ReactionLedger};

/// Spend every quota of `user` on distinct posts
async fn exhaust_quotas(engine: &TestEngine, user: UserId) {
    let ledger = ReactionLedger::new(&engine.ctx);
    let posts = engine.create_posts(TOTAL_REACTION_LIMIT as usize).await;
    let mut posts = posts.iter();
    for kind in ReactionType::ALL {
        for _ in 0..kind.limit() {
            let post = posts.next().unwrap();
            ledger.send_reaction(user, post.id, kind).await.unwrap();
        }
    }
}

// ============================================================================
// Quotas
// ============================================================================

#[tokio::test]
async fn test_first_reactions_accepted_up_to_quota() {
    for kind in ReactionType::ALL {
        let engine = TestEngine::new();
        let user = engine.new_user().await;
        let ledger = ReactionLedger::new(&engine.ctx);
        let posts = engine.create_posts(kind.limit() as usize + 1).await;

        for post in &posts[..kind.limit() as usize] {
            let change = ledger.send_reaction(user, post.id, kind).await.unwrap();
            assert_eq!(change, ReactionChange::Inserted { reaction_type: kind });
        }

        let last = posts.last().unwrap();
        assert_kind(
            ledger.send_reaction(user, last.id, kind).await,
            ErrorKind::QuotaExceeded,
        );
        assert_eq!(ledger.usage(user).await.unwrap().count(kind), kind.limit());
        assert_eq!(engine.backend.reaction_rows(last.id), 0);
    }
}

#[tokio::test]
async fn test_honor_scenario() {
    let engine = TestEngine::new();
    let author = UserId::random();
    let p1 = engine.create_post(author).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    ledger
        .send_reaction(user, p1.id, ReactionType::Honor)
        .await
        .unwrap();

    let post = PostService::new(&engine.ctx).get_post(p1.id).await.unwrap();
    assert_eq!(post.counts.honor, 1);

    let usage = ledger.get_user_usage(user).await.unwrap();
    let honor = usage.get(ReactionType::Honor).unwrap();
    assert_eq!(honor.count, 1);
    assert!(!honor.can_send);
    assert!(usage.get(ReactionType::Hug).unwrap().can_send);
}

#[tokio::test]
async fn test_recommend_scenario() {
    let engine = TestEngine::new();
    let posts = engine.create_posts(4).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    for post in &posts[..3] {
        ledger
            .send_reaction(user, post.id, ReactionType::Recommend)
            .await
            .unwrap();
    }

    let err = assert_kind(
        ledger
            .send_reaction(user, posts[3].id, ReactionType::Recommend)
            .await,
        ErrorKind::QuotaExceeded,
    );
    assert_eq!(err.error_code(), "QUOTA_EXCEEDED");
    assert_eq!(ledger.usage(user).await.unwrap().recommend, 3);
}

// ============================================================================
// Self reaction
// ============================================================================

#[tokio::test]
async fn test_self_reaction_rejected() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let own = engine.create_post(user).await;
    let ledger = ReactionLedger::new(&engine.ctx);

    for kind in ReactionType::ALL {
        assert_kind(
            ledger.send_reaction(user, own.id, kind).await,
            ErrorKind::SelfReaction,
        );
    }
    assert_eq!(engine.backend.reaction_rows(own.id), 0);
}

#[tokio::test]
async fn test_self_reaction_reported_even_when_locked() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let own = engine.create_post(user).await;
    exhaust_quotas(&engine, user).await;

    let ledger = ReactionLedger::new(&engine.ctx);
    assert!(ledger.usage(user).await.unwrap().is_locked());
    assert_kind(
        ledger.send_reaction(user, own.id, ReactionType::Hug).await,
        ErrorKind::SelfReaction,
    );
}

// ============================================================================
// Type change and cancellation
// ============================================================================

#[tokio::test]
async fn test_type_change_replaces_row_and_compensates_counters() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    ledger
        .send_reaction(user, post.id, ReactionType::Respect)
        .await
        .unwrap();
    let change = ledger
        .send_reaction(user, post.id, ReactionType::Hug)
        .await
        .unwrap();
    assert_eq!(
        change,
        ReactionChange::Changed {
            from: ReactionType::Respect,
            to: ReactionType::Hug
        }
    );

    assert_eq!(engine.backend.reaction_rows(post.id), 1);
    let stored = engine.backend.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!((stored.counts.respect, stored.counts.hug), (0, 1));

    let usage = ledger.usage(user).await.unwrap();
    assert_eq!((usage.respect, usage.hug), (0, 1));
    assert_eq!(
        ledger.my_reaction(user, post.id).await.unwrap(),
        Some(ReactionType::Hug)
    );
}

#[tokio::test]
async fn test_resending_same_type_is_noop() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    ledger
        .send_reaction(user, post.id, ReactionType::Honor)
        .await
        .unwrap();
    // Honor quota is already spent, but holding it on this post makes the resend a no-op
    let change = ledger
        .send_reaction(user, post.id, ReactionType::Honor)
        .await
        .unwrap();
    assert_eq!(
        change,
        ReactionChange::Unchanged {
            reaction_type: ReactionType::Honor
        }
    );

    let stored = engine.backend.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts.honor, 1);
    assert_eq!(engine.backend.reaction_rows(post.id), 1);
}

#[tokio::test]
async fn test_change_to_spent_type_is_refused() {
    let engine = TestEngine::new();
    let posts = engine.create_posts(2).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    ledger
        .send_reaction(user, posts[0].id, ReactionType::Honor)
        .await
        .unwrap();
    ledger
        .send_reaction(user, posts[1].id, ReactionType::Hug)
        .await
        .unwrap();

    assert_kind(
        ledger
            .send_reaction(user, posts[1].id, ReactionType::Honor)
            .await,
        ErrorKind::QuotaExceeded,
    );
    assert_eq!(
        ledger.my_reaction(user, posts[1].id).await.unwrap(),
        Some(ReactionType::Hug)
    );
}

#[tokio::test]
async fn test_cancel_reaction() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    assert_kind(
        ledger.cancel_reaction(user, post.id).await,
        ErrorKind::NotFound,
    );

    ledger
        .send_reaction(user, post.id, ReactionType::Recommend)
        .await
        .unwrap();
    let removed = ledger.cancel_reaction(user, post.id).await.unwrap();
    assert_eq!(removed, ReactionType::Recommend);

    let stored = engine.backend.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts.total(), 0);
    assert_eq!(engine.backend.reaction_rows(post.id), 0);
    assert_eq!(ledger.my_reaction(user, post.id).await.unwrap(), None);
    assert_eq!(ledger.usage(user).await.unwrap().total(), 0);
}

// ============================================================================
// Terminal lock
// ============================================================================

#[tokio::test]
async fn test_terminal_lock_blocks_send_and_cancel() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    exhaust_quotas(&engine, user).await;
    let ledger = ReactionLedger::new(&engine.ctx);

    let usage = ledger.get_user_usage(user).await.unwrap();
    assert!(usage.locked);
    assert_eq!(usage.total, TOTAL_REACTION_LIMIT);
    assert!(usage.types.iter().all(|t| !t.can_send));

    let reacted = ReactionRepository::find_by_user(&engine.backend, user)
        .await
        .unwrap();
    let held = reacted[0].clone();
    let fresh = engine.create_post(UserId::random()).await;

    assert_kind(
        ledger
            .send_reaction(user, fresh.id, ReactionType::Hug)
            .await,
        ErrorKind::QuotaExceeded,
    );
    assert_kind(
        ledger
            .send_reaction(user, held.post_id, held.reaction_type)
            .await,
        ErrorKind::QuotaExceeded,
    );
    assert_kind(
        ledger.cancel_reaction(user, held.post_id).await,
        ErrorKind::CancellationLocked,
    );
    assert_kind(
        ledger.cancel_reaction(user, fresh.id).await,
        ErrorKind::CancellationLocked,
    );
    assert_eq!(ledger.usage(user).await.unwrap().total(), TOTAL_REACTION_LIMIT);
}

// ============================================================================
// Sum invariant
// ============================================================================

#[tokio::test]
async fn test_counters_match_reaction_rows() {
    let engine = TestEngine::new();
    let posts = engine.create_posts(4).await;
    let ledger = ReactionLedger::new(&engine.ctx);
    let mut users = Vec::new();

    let script: [(usize, usize, Option<ReactionType>); 12] = [
        (0, 0, Some(ReactionType::Honor)),
        (0, 1, Some(ReactionType::Hug)),
        (0, 1, Some(ReactionType::Respect)),
        (1, 0, Some(ReactionType::Recommend)),
        (1, 0, None),
        (1, 2, Some(ReactionType::Honor)),
        (2, 0, Some(ReactionType::Respect)),
        (2, 3, Some(ReactionType::Recommend)),
        (2, 0, Some(ReactionType::Hug)),
        (0, 3, Some(ReactionType::Respect)),
        (0, 3, None),
        (1, 1, Some(ReactionType::Hug)),
    ];

    for _ in 0..3 {
        users.push(UserId::random());
    }

    for (user_index, post_index, action) in script {
        let user = users[user_index];
        engine.sign_in(user).await;
        let post_id = posts[post_index].id;
        match action {
            Some(kind) => {
                ledger.send_reaction(user, post_id, kind).await.unwrap();
            }
            None => {
                ledger.cancel_reaction(user, post_id).await.unwrap();
            }
        }

        for post in &posts {
            let stored = engine.backend.find_by_id(post.id).await.unwrap().unwrap();
            assert_eq!(
                stored.counts.total(),
                engine.backend.count_by_post(post.id).await.unwrap()
            );
            for kind in ReactionType::ALL {
                let mut rows = 0;
                for user in &users {
                    if let Some(reaction) = ReactionRepository::find(&engine.backend, *user, post.id)
                        .await
                        .unwrap()
                    {
                        rows += i64::from(reaction.is_type(kind));
                    }
                }
                assert_eq!(stored.counts.get(kind), rows, "{kind} on post {}", post.id);
            }
        }
    }
}

#[tokio::test]
async fn test_lost_counter_write_keeps_ledger_retryable() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    engine.backend.fail_next_counter_write();
    assert_kind(
        ledger.send_reaction(user, post.id, ReactionType::Honor).await,
        ErrorKind::NetworkFailure,
    );
    assert_eq!(engine.backend.reaction_rows(post.id), 0);

    let change = ledger
        .send_reaction(user, post.id, ReactionType::Honor)
        .await
        .unwrap();
    assert_eq!(
        change,
        ReactionChange::Inserted {
            reaction_type: ReactionType::Honor
        }
    );

    engine.backend.fail_next_counter_write();
    assert_kind(
        ledger.cancel_reaction(user, post.id).await,
        ErrorKind::NetworkFailure,
    );

    let stored = engine.backend.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts.honor, 1);
    assert_eq!(
        stored.counts.total(),
        engine.backend.count_by_post(post.id).await.unwrap()
    );

    assert_eq!(
        ledger.cancel_reaction(user, post.id).await.unwrap(),
        ReactionType::Honor
    );
    let stored = engine.backend.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts.total(), 0);
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn test_requires_matching_session() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let ledger = ReactionLedger::new(&engine.ctx);
    let stranger = UserId::random();

    assert_kind(
        ledger.send_reaction(stranger, post.id, ReactionType::Hug).await,
        ErrorKind::NotAuthenticated,
    );

    // Signed in, but as someone else
    engine.new_user().await;
    let err = assert_kind(
        ledger.cancel_reaction(stranger, post.id).await,
        ErrorKind::NotAuthenticated,
    );
    assert!(err.is_recoverable_prompt());

    engine.ctx.sessions().sign_out();
    assert!(engine.ctx.sessions().current().is_none());
}

#[tokio::test]
async fn test_missing_post() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    let err = assert_kind(
        ledger
            .send_reaction(user, PostId::new(404), ReactionType::Hug)
            .await,
        ErrorKind::NotFound,
    );
    assert_eq!(err.error_code(), "UNKNOWN_POST");
}

#[tokio::test]
async fn test_backend_outage_surfaces_network_failure() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    ledger
        .send_reaction(user, post.id, ReactionType::Hug)
        .await
        .unwrap();

    engine.backend.set_offline(true);
    let err = assert_kind(
        ledger
            .send_reaction(user, post.id, ReactionType::Respect)
            .await,
        ErrorKind::NetworkFailure,
    );
    assert!(err.is_recoverable_prompt());

    // Served from the local cache
    assert_eq!(
        ledger.my_reaction(user, post.id).await.unwrap(),
        Some(ReactionType::Hug)
    );
}

// ============================================================================
// Change notifications
// ============================================================================

#[tokio::test]
async fn test_send_publishes_post_and_reaction_changes() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let feed = engine.ctx.change_feed();
    let mut post_changes = feed.subscribe(Table::Posts).await.unwrap();
    let mut reaction_changes = feed.subscribe(Table::Reactions).await.unwrap();

    ReactionLedger::new(&engine.ctx)
        .send_reaction(user, post.id, ReactionType::Respect)
        .await
        .unwrap();

    let change = next_change(&mut post_changes).await.unwrap();
    assert_eq!(change.kind, ChangeKind::Update);
    assert_eq!(change.post_id, Some(post.id));

    let change = next_change(&mut reaction_changes).await.unwrap();
    assert_eq!(change.kind, ChangeKind::Insert);
    assert_eq!(change.user_id, Some(user));
}

#[tokio::test]
async fn test_invalidation_watcher_clears_cache() {
    let engine = TestEngine::new();
    let post = engine.create_post(UserId::random()).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    assert_eq!(ledger.my_reaction(user, post.id).await.unwrap(), None);
    assert_eq!(engine.ctx.reaction_cache().get(user, post.id), Some(None));

    let watcher = ledger.watch_invalidations().await.unwrap();
    engine
        .ctx
        .publish(wisdom_core::TableChange::reaction(
            ChangeKind::Insert,
            user,
            post.id,
        ))
        .await;

    let cache = engine.ctx.reaction_cache().clone();
    assert!(eventually(|| cache.get(user, post.id).is_none()).await);
    watcher.close().await;
}

#[tokio::test]
async fn test_cached_reactions_end_with_the_session() {
    let engine = TestEngine::new();
    let posts = engine.create_posts(3).await;
    let user = engine.new_user().await;
    let ledger = ReactionLedger::new(&engine.ctx);

    ledger
        .send_reaction(user, posts[0].id, ReactionType::Hug)
        .await
        .unwrap();
    for post in &posts[1..] {
        assert_eq!(ledger.my_reaction(user, post.id).await.unwrap(), None);
    }
    assert_eq!(engine.ctx.reaction_cache().len(), 3);

    engine.ctx.sessions().sign_out();
    assert!(engine.ctx.reaction_cache().is_empty());

    // A different user starts from an empty cache
    engine.sign_in(user).await;
    ledger.my_reactions(user).await.unwrap();
    assert_eq!(engine.ctx.reaction_cache().len(), 1);
    engine.new_user().await;
    assert!(engine.ctx.reaction_cache().is_empty());
}
