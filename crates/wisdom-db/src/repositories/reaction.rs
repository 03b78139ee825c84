//! PostgreSQL implementation of ReactionRepository
//!
//! Writes run in a transaction that first takes a per-user advisory lock, so
//! the quota and lock checks see every committed reaction of that user and
//! no concurrent write of the same user can interleave. The post's counter
//! update runs in the same transaction as the row write.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use wisdom_core::entities::{LedgerWrite, Reaction, ReactionChange, ReactionUsage};
use wisdom_core::error::DomainError;
use wisdom_core::traits::{ReactionRepository, RepoResult};
use wisdom_core::value_objects::{PostId, ReactionType, UserId};

use crate::mappers::{parse_reaction_type, usage_from_rows};
use crate::models::{ReactionModel, ReactionUsageModel};

use super::error::{map_db_error, map_unique_violation};
use super::post::adjust_counters_in;

const USAGE_QUERY: &str = r"
    SELECT reaction_type, COUNT(*) AS count
    FROM reactions
    WHERE user_id = $1
    GROUP BY reaction_type
";

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin_for_user(&self, user_id: UserId) -> RepoResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Ok(tx)
    }

    async fn usage_in(
        tx: &mut Transaction<'static, Postgres>,
        user_id: UserId,
    ) -> RepoResult<ReactionUsage> {
        let rows = sqlx::query_as::<_, ReactionUsageModel>(USAGE_QUERY)
        .bind(user_id.into_inner())
        .fetch_all(&mut **tx)
        .await
        .map_err(map_db_error)?;

        usage_from_rows(rows)
    }

    async fn current_type(
        tx: &mut Transaction<'static, Postgres>,
        user_id: UserId,
        post_id: PostId,
    ) -> RepoResult<Option<ReactionType>> {
        let current = sqlx::query_scalar::<_, String>(
            "SELECT reaction_type FROM reactions WHERE user_id = $1 AND post_id = $2",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;

        current.as_deref().map(parse_reaction_type).transpose()
    }
}

/// A missing post shows up as a foreign key violation, a lost insert race as
/// a primary key violation
fn insert_error(e: sqlx::Error, post_id: PostId) -> DomainError {
    let is_fk = e
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if is_fk {
        DomainError::PostNotFound(post_id)
    } else {
        map_unique_violation(e, || {
            DomainError::Conflict("reaction already exists".to_string())
        })
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT user_id, post_id, reaction_type, created_at
            FROM reactions
            WHERE user_id = $1 AND post_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT user_id, post_id, reaction_type, created_at
            FROM reactions
            WHERE user_id = $1
            ORDER BY created_at
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn usage(&self, user_id: UserId) -> RepoResult<ReactionUsage> {
        let rows = sqlx::query_as::<_, ReactionUsageModel>(USAGE_QUERY)
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        usage_from_rows(rows)
    }

    #[instrument(skip(self))]
    async fn count_by_post(&self, post_id: PostId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reactions WHERE post_id = $1")
            .bind(post_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, reaction), fields(user_id = %reaction.user_id, post_id = %reaction.post_id, reaction_type = %reaction.reaction_type))]
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<LedgerWrite> {
        let mut tx = self.begin_for_user(reaction.user_id).await?;

        let usage = Self::usage_in(&mut tx, reaction.user_id).await?;
        let existing = Self::current_type(&mut tx, reaction.user_id, reaction.post_id).await?;
        let change = usage.plan_send(existing, reaction.reaction_type)?;

        match change {
            ReactionChange::Inserted { .. } => {
                sqlx::query(
                    r"
                    INSERT INTO reactions (user_id, post_id, reaction_type, created_at)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(reaction.user_id.into_inner())
                .bind(reaction.post_id.into_inner())
                .bind(reaction.reaction_type.as_str())
                .bind(reaction.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_error(e, reaction.post_id))?;
            }
            ReactionChange::Changed { to, .. } => {
                sqlx::query(
                    r"
                    UPDATE reactions
                    SET reaction_type = $3
                    WHERE user_id = $1 AND post_id = $2
                    ",
                )
                .bind(reaction.user_id.into_inner())
                .bind(reaction.post_id.into_inner())
                .bind(to.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            ReactionChange::Unchanged { .. } | ReactionChange::Removed { .. } => {
                return Ok(LedgerWrite::unchanged(change));
            }
        }

        let counts = adjust_counters_in(&mut *tx, reaction.post_id, change.adjustment()).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(LedgerWrite::counted(change, counts))
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: UserId, post_id: PostId) -> RepoResult<LedgerWrite> {
        let mut tx = self.begin_for_user(user_id).await?;

        Self::usage_in(&mut tx, user_id).await?.check_cancel()?;

        let removed = sqlx::query_scalar::<_, String>(
            r"
            DELETE FROM reactions
            WHERE user_id = $1 AND post_id = $2
            RETURNING reaction_type
            ",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::ReactionNotFound { post_id })?;

        let change = ReactionChange::Removed {
            reaction_type: parse_reaction_type(&removed)?,
        };
        let counts = adjust_counters_in(&mut *tx, post_id, change.adjustment()).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(LedgerWrite::counted(change, counts))
    }
}
