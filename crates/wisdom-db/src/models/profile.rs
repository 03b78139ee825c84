//! Profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for profiles table
///
/// The three name columns are filled inconsistently by different writers;
/// the mapper reduces them to a single display name.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i16>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
