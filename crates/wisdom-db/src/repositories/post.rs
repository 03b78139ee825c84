//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use wisdom_core::entities::{CounterAdjustment, NewPost, Post, ReactionCounts};
use wisdom_core::error::DomainError;
use wisdom_core::traits::{PostRepository, RepoResult};
use wisdom_core::value_objects::{PostId, ReactionType, UserId};

use crate::models::{PostCountsModel, PostModel};

use super::error::{map_db_error, map_unique_violation};

const POST_COLUMNS: &str = "id, user_id, request_a, request_b, request_c, \
     honor_count, recommend_count, respect_count, hug_count, created_at";

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1"
        ))
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, post), fields(user_id = %post.user_id))]
    async fn create_and_clear_draft(&self, post: &NewPost) -> RepoResult<Post> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, PostModel>(&format!(
            r"
            INSERT INTO posts (user_id, request_a, request_b, request_c)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "
        ))
        .bind(post.user_id.into_inner())
        .bind(&post.request_a)
        .bind(&post.request_b)
        .bind(&post.request_c)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadySubmitted))?;

        sqlx::query("DELETE FROM drafts WHERE user_id = $1")
            .bind(post.user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Post::from(model))
    }

    #[instrument(skip(self))]
    async fn find_ranked(&self, limit: i64) -> RepoResult<Vec<Post>> {
        let results = sqlx::query_as::<_, PostModel>(&format!(
            r"
            SELECT {POST_COLUMNS}
            FROM posts
            ORDER BY honor_count DESC, recommend_count DESC, respect_count DESC,
                     created_at ASC, id ASC
            LIMIT $1
            "
        ))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }
}

/// Apply a counter adjustment as one floored UPDATE on the given connection.
///
/// Runs inside the reaction write's transaction, so a type change moves both
/// counters together with the row.
pub(super) async fn adjust_counters_in(
    conn: &mut PgConnection,
    id: PostId,
    adjustment: CounterAdjustment,
) -> RepoResult<ReactionCounts> {
    let result = sqlx::query_as::<_, PostCountsModel>(
        r"
        UPDATE posts
        SET honor_count = GREATEST(honor_count + $2, 0),
            recommend_count = GREATEST(recommend_count + $3, 0),
            respect_count = GREATEST(respect_count + $4, 0),
            hug_count = GREATEST(hug_count + $5, 0)
        WHERE id = $1
        RETURNING honor_count, recommend_count, respect_count, hug_count
        ",
    )
    .bind(id.into_inner())
    .bind(adjustment.delta(ReactionType::Honor))
    .bind(adjustment.delta(ReactionType::Recommend))
    .bind(adjustment.delta(ReactionType::Respect))
    .bind(adjustment.delta(ReactionType::Hug))
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    result
        .map(ReactionCounts::from)
        .ok_or(DomainError::PostNotFound(id))
}
