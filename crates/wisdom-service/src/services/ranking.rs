//! Ranking view
//!
//! Builds the leaderboard from aggregate counts and keeps subscribers
//! refreshed as posts change.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};
use wisdom_core::entities::{assign_ranks, AuthorSummary, RankingEntry};
use wisdom_core::events::Table;
use wisdom_core::UserId;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::subscription::Subscription;

/// Ranking view service
pub struct RankingView<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RankingView<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Leaderboard with at most `limit` entries, ranks starting at 1.
    ///
    /// A zero limit is rejected; limits above the configured maximum are clamped.
    #[instrument(skip(self))]
    pub async fn get_rankings(&self, limit: u32) -> ServiceResult<Vec<RankingEntry>> {
        if limit == 0 {
            return Err(ServiceError::validation("limit must be at least 1"));
        }
        let limit = limit.min(self.ctx.ranking_config().max_limit);

        let posts = self
            .ctx
            .post_repo()
            .find_ranked(i64::from(limit))
            .await?;

        let mut author_ids: Vec<UserId> = posts.iter().map(|post| post.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let profiles: HashMap<UserId, _> = self
            .ctx
            .profile_repo()
            .find_many(&author_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.user_id, profile))
            .collect();

        let entries: Vec<RankingEntry> = assign_ranks(posts)
            .into_iter()
            .map(|(rank, post)| RankingEntry {
                rank,
                author: AuthorSummary::from_profile(profiles.get(&post.user_id)),
                post,
            })
            .collect();

        debug!(count = entries.len(), "Rankings computed");
        Ok(entries)
    }

    /// Leaderboard using the configured default limit
    pub async fn get_default_rankings(&self) -> ServiceResult<Vec<RankingEntry>> {
        self.get_rankings(self.ctx.ranking_config().default_limit)
            .await
    }

    /// Re-fetch the leaderboard on every posts change and hand each
    /// snapshot to `callback`.
    ///
    /// A fetch that completes after the handle is closed is discarded.
    #[instrument(skip(self, callback))]
    pub async fn subscribe<F>(&self, limit: u32, callback: F) -> ServiceResult<Subscription>
    where
        F: Fn(Vec<RankingEntry>) + Send + Sync + 'static,
    {
        if limit == 0 {
            return Err(ServiceError::validation("limit must be at least 1"));
        }

        let changes = self.ctx.change_feed().subscribe(Table::Posts).await?;
        let ctx = self.ctx.clone();
        let callback = Arc::new(callback);

        Ok(Subscription::spawn(changes, move |change, liveness| {
            let ctx = ctx.clone();
            let callback = Arc::clone(&callback);
            async move {
                debug!(event = %change.event_type(), "Refreshing rankings");
                match RankingView::new(&ctx).get_rankings(limit).await {
                    Ok(entries) if liveness.is_alive() => callback(entries),
                    Ok(_) => debug!("Discarding rankings for a closed subscription"),
                    Err(e) => warn!(error = %e, "Failed to refresh rankings"),
                }
            }
        }))
    }
}
