//! Value objects - immutable types that represent domain concepts

mod ids;
mod reaction_type;

pub use ids::{IdParseError, PostId, UserId};
pub use reaction_type::{ReactionType, UnknownReactionType, TOTAL_REACTION_LIMIT};
