//! Reaction entity - a typed endorsement of another user's post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{CounterAdjustment, ReactionCounts};
use crate::error::DomainError;
use crate::value_objects::{PostId, ReactionType, UserId, TOTAL_REACTION_LIMIT};

/// Reaction entity, unique per (user, post)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: UserId,
    pub post_id: PostId,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(user_id: UserId, post_id: PostId, reaction_type: ReactionType) -> Self {
        Self {
            user_id,
            post_id,
            reaction_type,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_type(&self, reaction_type: ReactionType) -> bool {
        self.reaction_type == reaction_type
    }
}

/// Net effect of a ledger write on a (user, post) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReactionChange {
    Inserted { reaction_type: ReactionType },
    Changed { from: ReactionType, to: ReactionType },
    Unchanged { reaction_type: ReactionType },
    Removed { reaction_type: ReactionType },
}

impl ReactionChange {
    /// The counter adjustment this change implies for the post
    pub fn adjustment(&self) -> CounterAdjustment {
        match *self {
            Self::Inserted { reaction_type } => CounterAdjustment::increment(reaction_type),
            Self::Changed { from, to } => CounterAdjustment::change(from, to),
            Self::Unchanged { .. } => CounterAdjustment::default(),
            Self::Removed { reaction_type } => CounterAdjustment::decrement(reaction_type),
        }
    }

    /// The reaction the user holds on the post after the change
    pub fn current(&self) -> Option<ReactionType> {
        match *self {
            Self::Inserted { reaction_type } | Self::Unchanged { reaction_type } => {
                Some(reaction_type)
            }
            Self::Changed { to, .. } => Some(to),
            Self::Removed { .. } => None,
        }
    }
}

/// A committed ledger write together with the post counters it produced.
///
/// The reaction row and the counter adjustment are stored in one backend
/// operation; neither is visible without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerWrite {
    pub change: ReactionChange,
    /// Counters after the write, `None` when they were left untouched
    pub counts: Option<ReactionCounts>,
}

impl LedgerWrite {
    /// A write that did not move any counter
    pub fn unchanged(change: ReactionChange) -> Self {
        Self {
            change,
            counts: None,
        }
    }

    pub fn counted(change: ReactionChange, counts: ReactionCounts) -> Self {
        Self {
            change,
            counts: Some(counts),
        }
    }
}

/// A user's reaction counts per type, across all posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionUsage {
    pub honor: u32,
    pub recommend: u32,
    pub respect: u32,
    pub hug: u32,
}

impl ReactionUsage {
    /// Tally usage from a user's reactions
    pub fn from_types(types: impl IntoIterator<Item = ReactionType>) -> Self {
        let mut usage = Self::default();
        for kind in types {
            *usage.slot(kind) += 1;
        }
        usage
    }

    pub fn count(&self, kind: ReactionType) -> u32 {
        match kind {
            ReactionType::Honor => self.honor,
            ReactionType::Recommend => self.recommend,
            ReactionType::Respect => self.respect,
            ReactionType::Hug => self.hug,
        }
    }

    fn slot(&mut self, kind: ReactionType) -> &mut u32 {
        match kind {
            ReactionType::Honor => &mut self.honor,
            ReactionType::Recommend => &mut self.recommend,
            ReactionType::Respect => &mut self.respect,
            ReactionType::Hug => &mut self.hug,
        }
    }

    pub fn total(&self) -> u32 {
        self.honor + self.recommend + self.respect + self.hug
    }

    /// Terminal state: every quota is spent
    pub fn is_locked(&self) -> bool {
        self.total() >= TOTAL_REACTION_LIMIT
    }

    pub fn remaining(&self, kind: ReactionType) -> u32 {
        kind.limit().saturating_sub(self.count(kind))
    }

    /// Whether one more reaction of `kind` fits the quota
    pub fn can_send(&self, kind: ReactionType) -> bool {
        !self.is_locked() && self.count(kind) < kind.limit()
    }

    /// Decide the effect of sending `requested` to a post on which the user
    /// currently holds `existing`.
    ///
    /// The lock is checked first, then a resend of the held type is a no-op,
    /// then the per-type quota.
    pub fn plan_send(
        &self,
        existing: Option<ReactionType>,
        requested: ReactionType,
    ) -> Result<ReactionChange, DomainError> {
        if self.is_locked() {
            return Err(DomainError::quota_exceeded(requested));
        }
        if existing == Some(requested) {
            return Ok(ReactionChange::Unchanged {
                reaction_type: requested,
            });
        }
        if self.count(requested) >= requested.limit() {
            return Err(DomainError::quota_exceeded(requested));
        }
        Ok(match existing {
            Some(from) => ReactionChange::Changed {
                from,
                to: requested,
            },
            None => ReactionChange::Inserted {
                reaction_type: requested,
            },
        })
    }

    /// Cancellation is refused once the user is locked
    pub fn check_cancel(&self) -> Result<(), DomainError> {
        if self.is_locked() {
            Err(DomainError::CancellationLocked)
        } else {
            Ok(())
        }
    }

    /// Usage after applying a change
    #[must_use]
    pub fn after(mut self, change: ReactionChange) -> Self {
        let adjustment = change.adjustment();
        if let Some(kind) = adjustment.decrement {
            let slot = self.slot(kind);
            *slot = slot.saturating_sub(1);
        }
        if let Some(kind) = adjustment.increment {
            *self.slot(kind) += 1;
        }
        self
    }
}
