//! Session - an authenticated identity established by the identity provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ProfileNames;
use crate::value_objects::UserId;

/// Authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Name candidates from the provider's user metadata
    pub names: ProfileNames,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_valid_for(&self, user_id: UserId) -> bool {
        !self.is_expired() && self.user_id == user_id
    }
}
