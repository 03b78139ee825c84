//! Post entity - a submitted three-field reflection and its reaction counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{PostId, ReactionType, UserId};

/// The three text fields of a reflection, with their length bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    RequestA,
    RequestB,
    RequestC,
}

impl PostField {
    pub const ALL: [PostField; 3] = [Self::RequestA, Self::RequestB, Self::RequestC];

    /// Inclusive (min, max) length in characters
    pub const fn bounds(self) -> (usize, usize) {
        match self {
            Self::RequestA | Self::RequestC => (10, 40),
            Self::RequestB => (10, 150),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::RequestA => "request_a",
            Self::RequestB => "request_b",
            Self::RequestC => "request_c",
        }
    }

    /// Check a value against this field's bounds
    pub fn check(self, value: &str) -> Result<(), DomainError> {
        let (min, max) = self.bounds();
        let len = value.chars().count();
        if (min..=max).contains(&len) {
            Ok(())
        } else {
            Err(DomainError::ValidationFailed(format!(
                "{} must be {min}-{max} characters (got {len})",
                self.name()
            )))
        }
    }
}

/// Denormalized reaction counters stored on each post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub honor: i64,
    pub recommend: i64,
    pub respect: i64,
    pub hug: i64,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionType) -> i64 {
        match kind {
            ReactionType::Honor => self.honor,
            ReactionType::Recommend => self.recommend,
            ReactionType::Respect => self.respect,
            ReactionType::Hug => self.hug,
        }
    }

    fn slot(&mut self, kind: ReactionType) -> &mut i64 {
        match kind {
            ReactionType::Honor => &mut self.honor,
            ReactionType::Recommend => &mut self.recommend,
            ReactionType::Respect => &mut self.respect,
            ReactionType::Hug => &mut self.hug,
        }
    }

    /// Sum of all four counters
    pub fn total(&self) -> i64 {
        self.honor + self.recommend + self.respect + self.hug
    }

    /// Weighted display score
    pub fn score(&self) -> i64 {
        ReactionType::ALL
            .iter()
            .map(|kind| self.get(*kind) * i64::from(kind.weight()))
            .sum()
    }

    /// Apply an adjustment in place; counters never go below zero
    pub fn apply(&mut self, adjustment: CounterAdjustment) {
        if let Some(kind) = adjustment.decrement {
            let slot = self.slot(kind);
            *slot = (*slot - 1).max(0);
        }
        if let Some(kind) = adjustment.increment {
            *self.slot(kind) += 1;
        }
    }
}

/// A single atomic change to a post's counters
///
/// A type change carries both sides so it can be applied in one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterAdjustment {
    pub increment: Option<ReactionType>,
    pub decrement: Option<ReactionType>,
}

impl CounterAdjustment {
    pub fn increment(kind: ReactionType) -> Self {
        Self {
            increment: Some(kind),
            decrement: None,
        }
    }

    pub fn decrement(kind: ReactionType) -> Self {
        Self {
            increment: None,
            decrement: Some(kind),
        }
    }

    pub fn change(from: ReactionType, to: ReactionType) -> Self {
        Self {
            increment: Some(to),
            decrement: Some(from),
        }
    }

    /// Per-column delta, used to build a single UPDATE
    pub fn delta(&self, kind: ReactionType) -> i64 {
        let mut delta = 0;
        if self.increment == Some(kind) {
            delta += 1;
        }
        if self.decrement == Some(kind) {
            delta -= 1;
        }
        delta
    }

    pub fn is_noop(&self) -> bool {
        ReactionType::ALL.iter().all(|kind| self.delta(*kind) == 0)
    }
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub request_a: String,
    pub request_b: String,
    pub request_c: String,
    pub counts: ReactionCounts,
    pub created_at: DateTime<Utc>,
}

impl Post {
    #[inline]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn score(&self) -> i64 {
        self.counts.score()
    }
}

/// Validated field values for a post that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: UserId,
    pub request_a: String,
    pub request_b: String,
    pub request_c: String,
}

impl NewPost {
    /// Build a new post, trimming and validating all three fields
    pub fn new(
        user_id: UserId,
        request_a: &str,
        request_b: &str,
        request_c: &str,
    ) -> Result<Self, DomainError> {
        let post = Self {
            user_id,
            request_a: request_a.trim().to_string(),
            request_b: request_b.trim().to_string(),
            request_c: request_c.trim().to_string(),
        };
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        PostField::RequestA.check(&self.request_a)?;
        PostField::RequestB.check(&self.request_b)?;
        PostField::RequestC.check(&self.request_c)
    }

    /// Materialize with backend-assigned id and timestamp
    pub fn into_post(self, id: PostId, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            user_id: self.user_id,
            request_a: self.request_a,
            request_b: self.request_b,
            request_c: self.request_c,
            counts: ReactionCounts::default(),
            created_at,
        }
    }
}
