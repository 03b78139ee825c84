//! Domain entities - core business objects

mod draft;
mod post;
mod profile;
mod ranking;
mod reaction;
mod session;

pub use draft::Draft;
pub use post::{CounterAdjustment, NewPost, Post, PostField, ReactionCounts};
pub use profile::{normalize_display_name, Gender, Profile, ProfileNames, DEFAULT_DISPLAY_NAME};
pub use ranking::{assign_ranks, ranking_order, AuthorSummary, RankingEntry};
pub use reaction::{LedgerWrite, Reaction, ReactionChange, ReactionUsage};
pub use session::Session;
