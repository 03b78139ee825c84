//! Database models - SQLx-compatible structs for PostgreSQL tables

mod draft;
mod post;
mod profile;
mod reaction;

pub use draft::DraftModel;
pub use post::{PostCountsModel, PostModel};
pub use profile::ProfileModel;
pub use reaction::{ReactionModel, ReactionUsageModel};
