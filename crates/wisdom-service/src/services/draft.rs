//! Draft service
//!
//! Autosaves the in-progress form. At most one draft exists per user.

use tracing::{info, instrument};
use wisdom_core::entities::Draft;
use wisdom_core::events::{ChangeKind, Table, TableChange};
use wisdom_core::UserId;

use crate::dto::SaveDraftRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Draft service
pub struct DraftService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DraftService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save the draft, overwriting the previous one.
    ///
    /// Blank fields are stored as absent; present fields must satisfy the
    /// post field bounds.
    #[instrument(skip(self, request))]
    pub async fn save_draft(
        &self,
        user_id: UserId,
        request: SaveDraftRequest,
    ) -> ServiceResult<Draft> {
        self.ctx.sessions().require(user_id)?;

        let draft = Draft::new(
            user_id,
            request.request_a.as_deref(),
            request.request_b.as_deref(),
            request.request_c.as_deref(),
        );
        draft.validate()?;

        self.ctx.draft_repo().upsert(&draft).await?;
        self.ctx
            .publish(TableChange::new(Table::Drafts, ChangeKind::Update).with_user(user_id))
            .await;

        info!(user_id = %user_id, complete = draft.is_complete(), "Draft saved");
        Ok(draft)
    }

    #[instrument(skip(self))]
    pub async fn load_draft(&self, user_id: UserId) -> ServiceResult<Option<Draft>> {
        self.ctx.sessions().require(user_id)?;
        Ok(self.ctx.draft_repo().find(user_id).await?)
    }

    /// Delete the draft; discarding a missing draft is not an error
    #[instrument(skip(self))]
    pub async fn discard_draft(&self, user_id: UserId) -> ServiceResult<bool> {
        self.ctx.sessions().require(user_id)?;

        let removed = self.ctx.draft_repo().delete(user_id).await?;
        if removed {
            self.ctx
                .publish(TableChange::new(Table::Drafts, ChangeKind::Delete).with_user(user_id))
                .await;
        }
        Ok(removed)
    }
}
