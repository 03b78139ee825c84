//! Profile entity - display data joined into post and ranking views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::UserId;

/// Name shown when no usable name is recorded anywhere
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Self-reported gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// The name candidates a backend row or identity token may carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileNames {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub full_name: Option<String>,
}

/// Pick the display name: username, then display_name, then full_name.
///
/// Blank candidates are skipped; falls back to [`DEFAULT_DISPLAY_NAME`].
pub fn normalize_display_name(names: &ProfileNames) -> String {
    [&names.username, &names.display_name, &names.full_name]
        .into_iter()
        .filter_map(|candidate| candidate.as_deref().map(str::trim))
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}

/// Profile entity, one per authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: String,
    pub gender: Option<Gender>,
    pub age: Option<u8>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Default profile created on first sign-in
    pub fn new(user_id: UserId, names: &ProfileNames) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            display_name: normalize_display_name(names),
            gender: None,
            age: None,
            company: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_avatar_url(&mut self, avatar_url: Option<String>) {
        self.avatar_url = avatar_url;
        self.updated_at = Utc::now();
    }
}
