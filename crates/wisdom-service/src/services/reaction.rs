//! Reaction ledger
//!
//! Sends, changes and cancels reactions. Rule checks that can run locally
//! (session, post existence, self reaction) happen here; uniqueness, quotas
//! and the total lock are enforced again by the backend in the same write,
//! which also moves the post's counters.

use tracing::{info, instrument};
use wisdom_core::entities::{Reaction, ReactionChange, ReactionUsage};
use wisdom_core::events::{ChangeKind, Table, TableChange};
use wisdom_core::{DomainError, PostId, ReactionType, UserId};

use crate::dto::UsageResponse;

use super::context::ServiceContext;
use super::counter::AggregateCounter;
use super::error::ServiceResult;
use super::subscription::Subscription;

/// Reaction ledger service
pub struct ReactionLedger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionLedger<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send `reaction_type` to a post, replacing the type already held there
    #[instrument(skip(self))]
    pub async fn send_reaction(
        &self,
        user_id: UserId,
        post_id: PostId,
        reaction_type: ReactionType,
    ) -> ServiceResult<ReactionChange> {
        self.ctx.sessions().require(user_id)?;

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        // Own posts are refused before any quota state is consulted
        if post.is_owned_by(user_id) {
            return Err(DomainError::SelfReaction.into());
        }

        let write = self
            .ctx
            .reaction_repo()
            .upsert(&Reaction::new(user_id, post_id, reaction_type))
            .await?;
        let change = write.change;
        self.ctx
            .reaction_cache()
            .set(user_id, post_id, change.current());

        if let ReactionChange::Unchanged { .. } = change {
            return Ok(change);
        }

        AggregateCounter::new(self.ctx).record(post_id, &write).await;

        let kind = match change {
            ReactionChange::Inserted { .. } => ChangeKind::Insert,
            _ => ChangeKind::Update,
        };
        self.ctx
            .publish(TableChange::reaction(kind, user_id, post_id))
            .await;

        info!(
            user_id = %user_id,
            post_id = %post_id,
            reaction_type = %reaction_type,
            "Reaction sent"
        );

        Ok(change)
    }

    /// Withdraw the user's reaction on a post, returning the removed type
    #[instrument(skip(self))]
    pub async fn cancel_reaction(
        &self,
        user_id: UserId,
        post_id: PostId,
    ) -> ServiceResult<ReactionType> {
        self.ctx.sessions().require(user_id)?;

        let write = self.ctx.reaction_repo().delete(user_id, post_id).await?;
        self.ctx.reaction_cache().set(user_id, post_id, None);

        AggregateCounter::new(self.ctx).record(post_id, &write).await;
        self.ctx
            .publish(TableChange::reaction(ChangeKind::Delete, user_id, post_id))
            .await;

        let removed = match write.change {
            ReactionChange::Removed { reaction_type } => reaction_type,
            other => {
                return Err(DomainError::ServerFailure(format!(
                    "unexpected cancel result: {other:?}"
                ))
                .into())
            }
        };

        info!(
            user_id = %user_id,
            post_id = %post_id,
            reaction_type = %removed,
            "Reaction cancelled"
        );

        Ok(removed)
    }

    /// Per-type usage and send flags.
    ///
    /// Advisory: the backend repeats every check on write.
    #[instrument(skip(self))]
    pub async fn get_user_usage(&self, user_id: UserId) -> ServiceResult<UsageResponse> {
        let usage = self.usage(user_id).await?;
        Ok(UsageResponse::from(usage))
    }

    pub async fn usage(&self, user_id: UserId) -> ServiceResult<ReactionUsage> {
        Ok(self.ctx.reaction_repo().usage(user_id).await?)
    }

    /// The user's current reaction on a post, served from the local cache
    #[instrument(skip(self))]
    pub async fn my_reaction(
        &self,
        user_id: UserId,
        post_id: PostId,
    ) -> ServiceResult<Option<ReactionType>> {
        if let Some(cached) = self.ctx.reaction_cache().get(user_id, post_id) {
            return Ok(cached);
        }

        let current = self
            .ctx
            .reaction_repo()
            .find(user_id, post_id)
            .await?
            .map(|reaction| reaction.reaction_type);
        self.ctx.reaction_cache().set(user_id, post_id, current);
        Ok(current)
    }

    /// Load every reaction the user has sent and warm the cache with them
    #[instrument(skip(self))]
    pub async fn my_reactions(&self, user_id: UserId) -> ServiceResult<Vec<Reaction>> {
        let reactions = self.ctx.reaction_repo().find_by_user(user_id).await?;
        for reaction in &reactions {
            self.ctx
                .reaction_cache()
                .set(user_id, reaction.post_id, Some(reaction.reaction_type));
        }
        Ok(reactions)
    }

    /// Drop cache entries whenever another writer touches the reactions table
    #[instrument(skip(self))]
    pub async fn watch_invalidations(&self) -> ServiceResult<Subscription> {
        let changes = self.ctx.change_feed().subscribe(Table::Reactions).await?;
        let cache = self.ctx.reaction_cache().clone();

        Ok(Subscription::spawn(changes, move |change, _| {
            cache.invalidate(&change);
            async {}
        }))
    }
}
