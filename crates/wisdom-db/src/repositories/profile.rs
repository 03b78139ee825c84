//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use wisdom_core::entities::Profile;
use wisdom_core::error::DomainError;
use wisdom_core::traits::{ProfileRepository, RepoResult};
use wisdom_core::value_objects::UserId;

use crate::models::ProfileModel;

use super::error::map_db_error;

const PROFILE_COLUMNS: &str = "user_id, username, display_name, full_name, gender, age, \
     company, avatar_url, created_at, updated_at";

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        let result = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Profile::from))
    }

    #[instrument(skip(self, user_ids), fields(count = user_ids.len()))]
    async fn find_many(&self, user_ids: &[UserId]) -> RepoResult<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = user_ids.iter().map(|id| id.into_inner()).collect();
        let results = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Profile::from).collect())
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn insert_if_absent(&self, profile: &Profile) -> RepoResult<Profile> {
        sqlx::query(
            r"
            INSERT INTO profiles (user_id, display_name, gender, age, company, avatar_url,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(profile.user_id.into_inner())
        .bind(&profile.display_name)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.age.map(i16::from))
        .bind(&profile.company)
        .bind(&profile.avatar_url)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.find(profile.user_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(profile.user_id))
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn update(&self, profile: &Profile) -> RepoResult<()> {
        // The edited name replaces every provider-supplied candidate
        let result = sqlx::query(
            r"
            UPDATE profiles
            SET username = NULL,
                full_name = NULL,
                display_name = $2,
                gender = $3,
                age = $4,
                company = $5,
                avatar_url = $6,
                updated_at = $7
            WHERE user_id = $1
            ",
        )
        .bind(profile.user_id.into_inner())
        .bind(&profile.display_name)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.age.map(i16::from))
        .bind(&profile.company)
        .bind(&profile.avatar_url)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ProfileNotFound(profile.user_id));
        }

        Ok(())
    }
}
