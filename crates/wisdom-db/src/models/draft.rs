//! Draft database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for drafts table
#[derive(Debug, Clone, FromRow)]
pub struct DraftModel {
    pub user_id: Uuid,
    pub request_a: Option<String>,
    pub request_b: Option<String>,
    pub request_c: Option<String>,
    pub updated_at: DateTime<Utc>,
}
