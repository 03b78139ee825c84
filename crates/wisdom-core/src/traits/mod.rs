//! Ports - the backend capabilities the engine consumes

mod ports;
mod repositories;

pub use ports::{AvatarStorage, ChangeFeed, ChangeStream, IdentityProvider};
pub use repositories::{
    DraftRepository, PostRepository, ProfileRepository, ReactionRepository, RepoResult,
};
