//! PostgreSQL implementation of DraftRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wisdom_core::entities::Draft;
use wisdom_core::traits::{DraftRepository, RepoResult};
use wisdom_core::value_objects::UserId;

use crate::models::DraftModel;

use super::error::map_db_error;

/// PostgreSQL implementation of DraftRepository
#[derive(Clone)]
pub struct PgDraftRepository {
    pool: PgPool,
}

impl PgDraftRepository {
    /// Create a new PgDraftRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftRepository for PgDraftRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Draft>> {
        let result = sqlx::query_as::<_, DraftModel>(
            r"
            SELECT user_id, request_a, request_b, request_c, updated_at
            FROM drafts
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Draft::from))
    }

    #[instrument(skip(self, draft), fields(user_id = %draft.user_id))]
    async fn upsert(&self, draft: &Draft) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO drafts (user_id, request_a, request_b, request_c, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET request_a = EXCLUDED.request_a,
                request_b = EXCLUDED.request_b,
                request_c = EXCLUDED.request_c,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(draft.user_id.into_inner())
        .bind(&draft.request_a)
        .bind(&draft.request_b)
        .bind(&draft.request_c)
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: UserId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM drafts WHERE user_id = $1")
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
