//! In-memory row store implementing every repository trait
//!
//! All tables live behind one mutex, so each repository call is a single
//! serialized operation, the same guarantee the PostgreSQL adapter gets from
//! its transactions. Reaction writes stage the row and the counters and only
//! store them once both succeed.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use wisdom_core::entities::{
    assign_ranks, CounterAdjustment, Draft, LedgerWrite, NewPost, Post, Profile, Reaction,
    ReactionChange, ReactionCounts, ReactionUsage,
};
use wisdom_core::error::DomainError;
use wisdom_core::traits::{
    DraftRepository, PostRepository, ProfileRepository, ReactionRepository, RepoResult,
};
use wisdom_core::value_objects::{PostId, UserId};

#[derive(Debug, Default)]
struct Tables {
    posts: BTreeMap<PostId, Post>,
    last_post_id: i64,
    drafts: HashMap<UserId, Draft>,
    reactions: HashMap<(UserId, PostId), Reaction>,
    profiles: HashMap<UserId, Profile>,
}

impl Tables {
    /// Counters of `post_id` after `adjustment`, without storing them
    fn staged_counts(
        &self,
        post_id: PostId,
        adjustment: CounterAdjustment,
    ) -> RepoResult<ReactionCounts> {
        let mut counts = self
            .posts
            .get(&post_id)
            .map(|post| post.counts)
            .ok_or(DomainError::PostNotFound(post_id))?;
        counts.apply(adjustment);
        Ok(counts)
    }

    fn store_counts(&mut self, post_id: PostId, counts: ReactionCounts) {
        if let Some(post) = self.posts.get_mut(&post_id) {
            post.counts = counts;
        }
    }

    fn usage(&self, user_id: UserId) -> ReactionUsage {
        ReactionUsage::from_types(
            self.reactions
                .values()
                .filter(|r| r.user_id == user_id)
                .map(|r| r.reaction_type),
        )
    }
}

/// In-memory backend shared by every repository handle cloned from it
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<Mutex<Tables>>,
    offline: Arc<AtomicBool>,
    counter_fault: Arc<AtomicBool>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a lost connection: every call fails with `NetworkFailure`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make the next counter adjustment fail with `NetworkFailure`.
    ///
    /// The reaction write carrying it is rejected as a whole.
    pub fn fail_next_counter_write(&self) {
        self.counter_fault.store(true, Ordering::SeqCst);
    }

    /// Store a post as-is, e.g. with preset counters (fixtures)
    pub fn put_post(&self, post: Post) {
        let mut tables = self.tables.lock();
        tables.last_post_id = tables.last_post_id.max(post.id.into_inner());
        tables.posts.insert(post.id, post);
    }

    /// Number of stored drafts
    pub fn draft_count(&self) -> usize {
        self.tables.lock().drafts.len()
    }

    /// Number of stored reactions referencing a post
    pub fn reaction_rows(&self, post_id: PostId) -> usize {
        self.tables
            .lock()
            .reactions
            .keys()
            .filter(|(_, p)| *p == post_id)
            .count()
    }

    fn check_online(&self) -> RepoResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(DomainError::NetworkFailure("backend unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_counter_write(&self) -> RepoResult<()> {
        if self.counter_fault.swap(false, Ordering::SeqCst) {
            Err(DomainError::NetworkFailure("counter update lost".to_string()))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Posts
// ============================================================================

#[async_trait]
impl PostRepository for InMemoryBackend {
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.check_online()?;
        Ok(self.tables.lock().posts.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Post>> {
        self.check_online()?;
        Ok(self
            .tables
            .lock()
            .posts
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create_and_clear_draft(&self, post: &NewPost) -> RepoResult<Post> {
        self.check_online()?;
        let mut tables = self.tables.lock();
        if tables.posts.values().any(|p| p.user_id == post.user_id) {
            return Err(DomainError::AlreadySubmitted);
        }

        tables.last_post_id += 1;
        let id = PostId::new(tables.last_post_id);
        let stored = post.clone().into_post(id, Utc::now());
        tables.posts.insert(id, stored.clone());
        tables.drafts.remove(&post.user_id);
        Ok(stored)
    }

    async fn find_ranked(&self, limit: i64) -> RepoResult<Vec<Post>> {
        self.check_online()?;
        let posts: Vec<Post> = self.tables.lock().posts.values().cloned().collect();
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(assign_ranks(posts)
            .into_iter()
            .take(limit)
            .map(|(_, post)| post)
            .collect())
    }
}

// ============================================================================
// Drafts
// ============================================================================

#[async_trait]
impl DraftRepository for InMemoryBackend {
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Draft>> {
        self.check_online()?;
        Ok(self.tables.lock().drafts.get(&user_id).cloned())
    }

    async fn upsert(&self, draft: &Draft) -> RepoResult<()> {
        self.check_online()?;
        self.tables.lock().drafts.insert(draft.user_id, draft.clone());
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> RepoResult<bool> {
        self.check_online()?;
        Ok(self.tables.lock().drafts.remove(&user_id).is_some())
    }
}

// ============================================================================
// Reactions
// ============================================================================

#[async_trait]
impl ReactionRepository for InMemoryBackend {
    async fn find(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<Reaction>> {
        self.check_online()?;
        Ok(self.tables.lock().reactions.get(&(user_id, post_id)).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Reaction>> {
        self.check_online()?;
        let mut reactions: Vec<Reaction> = self
            .tables
            .lock()
            .reactions
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reactions.sort_by_key(|r| (r.created_at, r.post_id));
        Ok(reactions)
    }

    async fn usage(&self, user_id: UserId) -> RepoResult<ReactionUsage> {
        self.check_online()?;
        Ok(self.tables.lock().usage(user_id))
    }

    async fn count_by_post(&self, post_id: PostId) -> RepoResult<i64> {
        self.check_online()?;
        Ok(self.reaction_rows(post_id) as i64)
    }

    async fn upsert(&self, reaction: &Reaction) -> RepoResult<LedgerWrite> {
        self.check_online()?;
        let mut tables = self.tables.lock();
        if !tables.posts.contains_key(&reaction.post_id) {
            return Err(DomainError::PostNotFound(reaction.post_id));
        }

        let key = (reaction.user_id, reaction.post_id);
        let existing = tables.reactions.get(&key).map(|r| r.reaction_type);
        let change = tables
            .usage(reaction.user_id)
            .plan_send(existing, reaction.reaction_type)?;

        let stored = match change {
            ReactionChange::Inserted { .. } => reaction.clone(),
            ReactionChange::Changed { to, .. } => match tables.reactions.get(&key) {
                Some(existing) => Reaction {
                    reaction_type: to,
                    ..existing.clone()
                },
                None => return Err(DomainError::ReactionNotFound { post_id: key.1 }),
            },
            ReactionChange::Unchanged { .. } | ReactionChange::Removed { .. } => {
                return Ok(LedgerWrite::unchanged(change));
            }
        };

        let counts = tables.staged_counts(reaction.post_id, change.adjustment())?;
        self.check_counter_write()?;

        tables.reactions.insert(key, stored);
        tables.store_counts(reaction.post_id, counts);
        Ok(LedgerWrite::counted(change, counts))
    }

    async fn delete(&self, user_id: UserId, post_id: PostId) -> RepoResult<LedgerWrite> {
        self.check_online()?;
        let mut tables = self.tables.lock();
        tables.usage(user_id).check_cancel()?;

        let change = tables
            .reactions
            .get(&(user_id, post_id))
            .map(|r| ReactionChange::Removed {
                reaction_type: r.reaction_type,
            })
            .ok_or(DomainError::ReactionNotFound { post_id })?;

        let counts = tables.staged_counts(post_id, change.adjustment())?;
        self.check_counter_write()?;

        tables.reactions.remove(&(user_id, post_id));
        tables.store_counts(post_id, counts);
        Ok(LedgerWrite::counted(change, counts))
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[async_trait]
impl ProfileRepository for InMemoryBackend {
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        self.check_online()?;
        Ok(self.tables.lock().profiles.get(&user_id).cloned())
    }

    async fn find_many(&self, user_ids: &[UserId]) -> RepoResult<Vec<Profile>> {
        self.check_online()?;
        let tables = self.tables.lock();
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.profiles.get(id).cloned())
            .collect())
    }

    async fn insert_if_absent(&self, profile: &Profile) -> RepoResult<Profile> {
        self.check_online()?;
        Ok(self
            .tables
            .lock()
            .profiles
            .entry(profile.user_id)
            .or_insert_with(|| profile.clone())
            .clone())
    }

    async fn update(&self, profile: &Profile) -> RepoResult<()> {
        self.check_online()?;
        let mut tables = self.tables.lock();
        let stored = tables
            .profiles
            .get_mut(&profile.user_id)
            .ok_or(DomainError::ProfileNotFound(profile.user_id))?;
        *stored = profile.clone();
        Ok(())
    }
}
