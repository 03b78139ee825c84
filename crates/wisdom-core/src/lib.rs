//! # wisdom-core
//!
//! Domain layer containing entities, value objects, backend ports, and change events.
//! This crate has zero dependencies on infrastructure (database, cache, runtime).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    assign_ranks, normalize_display_name, ranking_order, AuthorSummary, CounterAdjustment, Draft,
    Gender, LedgerWrite, NewPost, Post, PostField, Profile, ProfileNames, RankingEntry, Reaction,
    ReactionChange, ReactionCounts, ReactionUsage, Session, DEFAULT_DISPLAY_NAME,
};
pub use error::{DomainError, ErrorKind};
pub use events::{ChangeKind, Table, TableChange};
pub use traits::{
    AvatarStorage, ChangeFeed, ChangeStream, DraftRepository, IdentityProvider, PostRepository,
    ProfileRepository, ReactionRepository, RepoResult,
};
pub use value_objects::{
    IdParseError, PostId, ReactionType, UnknownReactionType, UserId, TOTAL_REACTION_LIMIT,
};
