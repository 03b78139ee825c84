//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub user_id: Uuid,
    pub request_a: String,
    pub request_b: String,
    pub request_c: String,
    pub honor_count: i64,
    pub recommend_count: i64,
    pub respect_count: i64,
    pub hug_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Counter columns returned by an adjustment
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PostCountsModel {
    pub honor_count: i64,
    pub recommend_count: i64,
    pub respect_count: i64,
    pub hug_count: i64,
}
