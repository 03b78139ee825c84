//! Reaction types and their per-user quotas

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of reactions a user can hold across all posts.
///
/// Equal to the sum of the per-type limits. Reaching it locks the user's
/// reactions: no further sends or cancellations.
pub const TOTAL_REACTION_LIMIT: u32 = ReactionType::Honor.limit()
    + ReactionType::Recommend.limit()
    + ReactionType::Respect.limit()
    + ReactionType::Hug.limit();

/// One of the four endorsements a user can grant to another user's post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Honor,
    Recommend,
    Respect,
    Hug,
}

impl ReactionType {
    /// All reaction types in ranking priority order
    pub const ALL: [ReactionType; 4] = [Self::Honor, Self::Recommend, Self::Respect, Self::Hug];

    /// Per-user quota for this type, counted across all posts
    pub const fn limit(self) -> u32 {
        match self {
            Self::Honor => 1,
            Self::Recommend => 3,
            Self::Respect => 5,
            Self::Hug => 3,
        }
    }

    /// Weight used for the display score
    pub const fn weight(self) -> u32 {
        match self {
            Self::Honor => 5,
            Self::Recommend => 3,
            Self::Respect => 2,
            Self::Hug => 1,
        }
    }

    /// Stored/wire name of the type
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Honor => "honor",
            Self::Recommend => "recommend",
            Self::Respect => "respect",
            Self::Hug => "hug",
        }
    }

    /// Name of the denormalized counter column on the posts table
    pub const fn counter_column(self) -> &'static str {
        match self {
            Self::Honor => "honor_count",
            Self::Recommend => "recommend_count",
            Self::Respect => "respect_count",
            Self::Hug => "hug_count",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known reaction type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reaction type: {0}")]
pub struct UnknownReactionType(pub String);

impl FromStr for ReactionType {
    type Err = UnknownReactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "honor" => Ok(Self::Honor),
            "recommend" => Ok(Self::Recommend),
            "respect" => Ok(Self::Respect),
            "hug" => Ok(Self::Hug),
            _ => Err(UnknownReactionType(s.to_string())),
        }
    }
}
