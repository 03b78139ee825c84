//! Post service
//!
//! Submission of the final form and post lookups.

use tracing::{info, instrument};
use wisdom_core::entities::Post;
use wisdom_core::events::{ChangeKind, Table, TableChange};
use wisdom_core::{DomainError, PostId, UserId};

use crate::dto::SubmitPostRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit the user's post and clear their draft.
    ///
    /// Each user submits once; a second submission is a conflict.
    #[instrument(skip(self, request))]
    pub async fn submit(&self, user_id: UserId, request: SubmitPostRequest) -> ServiceResult<Post> {
        self.ctx.sessions().require(user_id)?;
        let new_post = request.into_new_post(user_id)?;

        if self.ctx.post_repo().find_by_user(user_id).await?.is_some() {
            return Err(DomainError::AlreadySubmitted.into());
        }

        // The backend enforces one post per user again inside this write
        let post = self.ctx.post_repo().create_and_clear_draft(&new_post).await?;

        self.ctx
            .publish(TableChange::post(ChangeKind::Insert, post.id).with_user(user_id))
            .await;
        self.ctx
            .publish(TableChange::new(Table::Drafts, ChangeKind::Delete).with_user(user_id))
            .await;

        info!(user_id = %user_id, post_id = %post.id, "Post submitted");
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: PostId) -> ServiceResult<Post> {
        Ok(self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?)
    }

    /// The post the user submitted, if any
    #[instrument(skip(self))]
    pub async fn my_post(&self, user_id: UserId) -> ServiceResult<Option<Post>> {
        Ok(self.ctx.post_repo().find_by_user(user_id).await?)
    }
}
