//! Engine services
//!
//! Each service borrows the shared [`ServiceContext`] and orchestrates
//! validation, backend writes and change notifications for one concern.

pub mod context;
pub mod counter;
pub mod draft;
pub mod error;
pub mod post;
pub mod profile;
pub mod ranking;
pub mod reaction;
pub mod session;
pub mod subscription;

pub use context::{ReactionCache, ServiceContext, ServiceContextBuilder, DEFAULT_AVATAR_MAX_BYTES};
pub use counter::AggregateCounter;
pub use draft::DraftService;
pub use error::{ServiceError, ServiceResult};
pub use post::PostService;
pub use profile::ProfileService;
pub use ranking::RankingView;
pub use reaction::ReactionLedger;
pub use session::SessionManager;
pub use subscription::{Liveness, Subscription};
