//! Draft entity - a user's unsubmitted, partially filled reflection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::PostField;
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Draft entity, at most one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub user_id: UserId,
    pub request_a: Option<String>,
    pub request_b: Option<String>,
    pub request_c: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Create a draft; blank fields are stored as absent
    pub fn new(
        user_id: UserId,
        request_a: Option<&str>,
        request_b: Option<&str>,
        request_c: Option<&str>,
    ) -> Self {
        Self {
            user_id,
            request_a: normalize(request_a),
            request_b: normalize(request_b),
            request_c: normalize(request_c),
            updated_at: Utc::now(),
        }
    }

    pub fn field(&self, field: PostField) -> Option<&str> {
        match field {
            PostField::RequestA => self.request_a.as_deref(),
            PostField::RequestB => self.request_b.as_deref(),
            PostField::RequestC => self.request_c.as_deref(),
        }
    }

    /// Present fields must satisfy the post bounds; absent ones are allowed
    pub fn validate(&self) -> Result<(), DomainError> {
        for field in PostField::ALL {
            if let Some(value) = self.field(field) {
                field.check(value)?;
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        PostField::ALL.iter().all(|f| self.field(*f).is_none())
    }

    /// True once every field holds a value (the form can be submitted)
    pub fn is_complete(&self) -> bool {
        PostField::ALL.iter().all(|f| self.field(*f).is_some())
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
