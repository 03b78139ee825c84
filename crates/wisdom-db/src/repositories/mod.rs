//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in wisdom-core.
//! Each repository handles database operations for a specific domain entity.

mod draft;
mod error;
mod post;
mod profile;
mod reaction;

pub use draft::PgDraftRepository;
pub use error::map_db_error;
pub use post::PgPostRepository;
pub use profile::PgProfileRepository;
pub use reaction::PgReactionRepository;
