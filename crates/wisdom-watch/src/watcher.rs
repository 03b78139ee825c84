//! Leaderboard logging

use tokio::signal;
use tracing::info;
use wisdom_core::entities::RankingEntry;
use wisdom_service::RankingView;

use crate::bootstrap::Engine;

/// Log one leaderboard snapshot, one event per entry
pub fn log_snapshot(entries: &[RankingEntry]) {
    info!(entries = entries.len(), "Leaderboard snapshot");
    for entry in entries {
        info!(
            rank = entry.rank,
            post_id = %entry.post.id,
            author = %entry.author.display_name,
            honor = entry.post.counts.honor,
            recommend = entry.post.counts.recommend,
            respect = entry.post.counts.respect,
            hug = entry.post.counts.hug,
            score = entry.post.score(),
            "Ranking"
        );
    }
}

/// Log the current leaderboard, then every refresh until Ctrl-C
pub async fn watch(engine: Engine) -> anyhow::Result<()> {
    let view = RankingView::new(&engine.context);

    log_snapshot(&view.get_default_rankings().await?);

    let limit = engine.context.ranking_config().default_limit;
    let subscription = view
        .subscribe(limit, |entries| log_snapshot(&entries))
        .await?;
    info!("Watching leaderboard, press Ctrl-C to stop");

    signal::ctrl_c().await?;
    info!("Shutting down");

    subscription.close().await;
    engine.feed.shutdown().await?;
    Ok(())
}
