//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs from the managed backend's row
//! store; the infrastructure layer provides the implementation (PostgreSQL
//! or the in-memory backend).

use async_trait::async_trait;

use crate::entities::{Draft, LedgerWrite, NewPost, Post, Profile, Reaction, ReactionUsage};
use crate::error::DomainError;
use crate::value_objects::{PostId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>>;

    /// Find the post a user submitted, if any
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Post>>;

    /// Insert a post and delete its author's draft in one operation.
    ///
    /// Fails with `AlreadySubmitted` if the author already has a post.
    async fn create_and_clear_draft(&self, post: &NewPost) -> RepoResult<Post>;

    /// Posts in leaderboard order, at most `limit`
    async fn find_ranked(&self, limit: i64) -> RepoResult<Vec<Post>>;
}

// ============================================================================
// Draft Repository
// ============================================================================

#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Find a user's draft
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Draft>>;

    /// Insert or overwrite the user's draft
    async fn upsert(&self, draft: &Draft) -> RepoResult<()>;

    /// Delete the user's draft, returning whether one existed
    async fn delete(&self, user_id: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find a user's reaction on a post
    async fn find(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<Reaction>>;

    /// All reactions sent by a user
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Reaction>>;

    /// Per-type counts of a user's reactions
    async fn usage(&self, user_id: UserId) -> RepoResult<ReactionUsage>;

    /// Number of reactions referencing a post
    async fn count_by_post(&self, post_id: PostId) -> RepoResult<i64>;

    /// Insert the reaction or change the type of the existing one.
    ///
    /// Uniqueness, the per-type quota and the total lock are re-checked, and
    /// the post's counters adjusted, in the same atomic operation as the row
    /// write. A failure leaves both untouched.
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<LedgerWrite>;

    /// Delete a reaction and decrement the post's counter atomically,
    /// re-checking the total lock
    async fn delete(&self, user_id: UserId, post_id: PostId) -> RepoResult<LedgerWrite>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by user ID
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Profile>>;

    /// Find profiles for a set of users (missing users are skipped)
    async fn find_many(&self, user_ids: &[UserId]) -> RepoResult<Vec<Profile>>;

    /// Insert the profile unless one exists; returns the stored profile
    async fn insert_if_absent(&self, profile: &Profile) -> RepoResult<Profile>;

    /// Update an existing profile
    async fn update(&self, profile: &Profile) -> RepoResult<()>;
}
