//! Service context - dependency container for services
//!
//! Holds the backend ports, the session manager and the client-side caches.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;
use wisdom_common::RankingConfig;
use wisdom_core::events::TableChange;
use wisdom_core::traits::{
    AvatarStorage, ChangeFeed, DraftRepository, IdentityProvider, PostRepository,
    ProfileRepository, ReactionRepository,
};
use wisdom_core::{PostId, ReactionType, UserId};

use super::error::{ServiceError, ServiceResult};
use super::session::SessionManager;

/// Default avatar size limit (2 MiB)
pub const DEFAULT_AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Disposable "have I reacted" cache keyed by (user, post)
///
/// `None` records a known absence so repeated lookups stay local. Owned by
/// the [`SessionManager`] and emptied whenever the signed-in user changes.
#[derive(Debug, Clone, Default)]
pub struct ReactionCache {
    entries: Arc<DashMap<(UserId, PostId), Option<ReactionType>>>,
}

impl ReactionCache {
    pub fn get(&self, user_id: UserId, post_id: PostId) -> Option<Option<ReactionType>> {
        self.entries.get(&(user_id, post_id)).map(|entry| *entry)
    }

    pub fn set(&self, user_id: UserId, post_id: PostId, reaction: Option<ReactionType>) {
        self.entries.insert((user_id, post_id), reaction);
    }

    /// Forget whatever a change event may have made stale
    pub fn invalidate(&self, change: &TableChange) {
        match (change.user_id, change.post_id) {
            (Some(user_id), Some(post_id)) => {
                self.entries.remove(&(user_id, post_id));
            }
            (None, Some(post_id)) => self.entries.retain(|(_, post), _| *post != post_id),
            (Some(user_id), None) => self.entries.retain(|(user, _), _| *user != user_id),
            (None, None) => self.entries.clear(),
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Service context containing all dependencies
///
/// Every backend capability is an injected trait object so the engine runs
/// unchanged against PostgreSQL/Redis or the in-memory backend.
#[derive(Clone)]
pub struct ServiceContext {
    // Row store
    post_repo: Arc<dyn PostRepository>,
    draft_repo: Arc<dyn DraftRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    profile_repo: Arc<dyn ProfileRepository>,

    // Realtime and objects
    change_feed: Arc<dyn ChangeFeed>,
    avatar_storage: Arc<dyn AvatarStorage>,

    sessions: SessionManager,

    ranking: RankingConfig,
    avatar_max_bytes: usize,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn draft_repo(&self) -> &dyn DraftRepository {
        self.draft_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    // === Realtime / Storage ===

    pub fn change_feed(&self) -> &dyn ChangeFeed {
        self.change_feed.as_ref()
    }

    pub fn avatar_storage(&self) -> &dyn AvatarStorage {
        self.avatar_storage.as_ref()
    }

    // === Session / Caches ===

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn reaction_cache(&self) -> &ReactionCache {
        self.sessions.reaction_cache()
    }

    // === Settings ===

    pub fn ranking_config(&self) -> RankingConfig {
        self.ranking
    }

    pub fn avatar_max_bytes(&self) -> usize {
        self.avatar_max_bytes
    }

    /// Publish a change notification.
    ///
    /// Delivery failures are logged and swallowed; the write they describe
    /// has already succeeded.
    pub async fn publish(&self, change: TableChange) {
        if let Err(e) = self.change_feed.publish(&change).await {
            warn!(event = %change.event_type(), error = %e, "Failed to publish change");
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("sessions", &self.sessions)
            .field("cached_reactions", &self.reaction_cache().len())
            .field("ranking", &self.ranking)
            .field("avatar_max_bytes", &self.avatar_max_bytes)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    post_repo: Option<Arc<dyn PostRepository>>,
    draft_repo: Option<Arc<dyn DraftRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    change_feed: Option<Arc<dyn ChangeFeed>>,
    avatar_storage: Option<Arc<dyn AvatarStorage>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    ranking: RankingConfig,
    avatar_max_bytes: Option<usize>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn draft_repo(mut self, repo: Arc<dyn DraftRepository>) -> Self {
        self.draft_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn change_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.change_feed = Some(feed);
        self
    }

    pub fn avatar_storage(mut self, storage: Arc<dyn AvatarStorage>) -> Self {
        self.avatar_storage = Some(storage);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn avatar_max_bytes(mut self, bytes: usize) -> Self {
        self.avatar_max_bytes = Some(bytes);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let profile_repo = required(self.profile_repo, "profile_repo")?;
        let identity = required(self.identity, "identity")?;

        Ok(ServiceContext {
            post_repo: required(self.post_repo, "post_repo")?,
            draft_repo: required(self.draft_repo, "draft_repo")?,
            reaction_repo: required(self.reaction_repo, "reaction_repo")?,
            sessions: SessionManager::new(identity, profile_repo.clone()),
            profile_repo,
            change_feed: required(self.change_feed, "change_feed")?,
            avatar_storage: required(self.avatar_storage, "avatar_storage")?,
            ranking: self.ranking,
            avatar_max_bytes: self.avatar_max_bytes.unwrap_or(DEFAULT_AVATAR_MAX_BYTES),
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
}
