//! Reaction entity <-> model mapper

use wisdom_core::entities::{Reaction, ReactionUsage};
use wisdom_core::error::DomainError;
use wisdom_core::value_objects::{PostId, ReactionType, UserId};

use crate::models::{ReactionModel, ReactionUsageModel};

/// Parse a stored reaction type; the column is CHECK-constrained so a
/// failure means the row was written by something else
pub fn parse_reaction_type(value: &str) -> Result<ReactionType, DomainError> {
    value
        .parse()
        .map_err(|e| DomainError::DatabaseError(format!("corrupt reactions row: {e}")))
}

/// Convert ReactionModel to Reaction entity
impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            user_id: UserId::new(model.user_id),
            post_id: PostId::new(model.post_id),
            reaction_type: parse_reaction_type(&model.reaction_type)?,
            created_at: model.created_at,
        })
    }
}

/// Fold grouped per-type counts into a usage summary
pub fn usage_from_rows(rows: Vec<ReactionUsageModel>) -> Result<ReactionUsage, DomainError> {
    let mut usage = ReactionUsage::default();
    for row in rows {
        let count = u32::try_from(row.count).unwrap_or(u32::MAX);
        match parse_reaction_type(&row.reaction_type)? {
            ReactionType::Honor => usage.honor = count,
            ReactionType::Recommend => usage.recommend = count,
            ReactionType::Respect => usage.respect = count,
            ReactionType::Hug => usage.hug = count,
        }
    }
    Ok(usage)
}
