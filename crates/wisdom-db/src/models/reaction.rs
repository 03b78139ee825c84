//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub user_id: Uuid,
    pub post_id: i64,
    pub reaction_type: String,
    pub created_at: DateTime<Utc>,
}

/// Per-type reaction count for one user (from query)
#[derive(Debug, Clone, FromRow)]
pub struct ReactionUsageModel {
    pub reaction_type: String,
    pub count: i64,
}
