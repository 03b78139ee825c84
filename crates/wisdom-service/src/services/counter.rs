//! Aggregate counter
//!
//! Each post's denormalized reaction counters move in the same backend write
//! as the ledger row; this service reports the new counters and announces
//! them to ranking subscribers.

use tracing::{debug, instrument};
use wisdom_core::entities::{LedgerWrite, ReactionCounts};
use wisdom_core::events::{ChangeKind, TableChange};
use wisdom_core::PostId;

use super::context::ServiceContext;

/// Aggregate counter service
pub struct AggregateCounter<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AggregateCounter<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish the counter effect of a committed ledger write.
    ///
    /// Returns `None` when the write left the counters untouched, in which
    /// case nothing is published.
    #[instrument(skip(self, write))]
    pub async fn record(&self, post_id: PostId, write: &LedgerWrite) -> Option<ReactionCounts> {
        let counts = write.counts?;

        debug!(
            post_id = %post_id,
            honor = counts.honor,
            recommend = counts.recommend,
            respect = counts.respect,
            hug = counts.hug,
            score = counts.score(),
            "Counters adjusted"
        );

        self.ctx
            .publish(TableChange::post(ChangeKind::Update, post_id))
            .await;

        Some(counts)
    }
}
