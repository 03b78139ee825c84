//! Test fixtures and data generators
//!
//! [`TestEngine`] is a fully wired service context over the in-memory
//! backend, change feed and avatar bucket.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use wisdom_common::{JwtService, RankingConfig, UserMetadata};
use wisdom_core::entities::{NewPost, Post, ReactionCounts};
use wisdom_core::traits::PostRepository;
use wisdom_core::{PostId, UserId};
use wisdom_db::{InMemoryAvatarStorage, InMemoryBackend, InMemoryChangeFeed};
use wisdom_service::{SaveDraftRequest, ServiceContext, SubmitPostRequest};

/// Signing secret shared by the fixture identity provider
pub const TEST_SECRET: &str = "integration-test-secret";

/// Public base URL of the fixture avatar bucket
pub const AVATAR_BASE_URL: &str = "https://cdn.test/avatars";

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Engine wired to in-memory adapters
pub struct TestEngine {
    pub ctx: ServiceContext,
    pub backend: InMemoryBackend,
    pub feed: InMemoryChangeFeed,
    pub storage: InMemoryAvatarStorage,
    pub jwt: Arc<JwtService>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_ranking(RankingConfig::default())
    }

    pub fn with_ranking(ranking: RankingConfig) -> Self {
        Self::build(ranking, 16 * 1024)
    }

    /// Engine with a custom avatar size limit
    pub fn with_avatar_limit(max_bytes: usize) -> Self {
        Self::build(RankingConfig::default(), max_bytes)
    }

    fn build(ranking: RankingConfig, avatar_max_bytes: usize) -> Self {
        let backend = InMemoryBackend::new();
        let feed = InMemoryChangeFeed::new(64);
        let storage = InMemoryAvatarStorage::new(AVATAR_BASE_URL);
        let jwt = Arc::new(JwtService::new(TEST_SECRET, 3600));

        let ctx = ServiceContext::builder()
            .post_repo(Arc::new(backend.clone()))
            .draft_repo(Arc::new(backend.clone()))
            .reaction_repo(Arc::new(backend.clone()))
            .profile_repo(Arc::new(backend.clone()))
            .change_feed(Arc::new(feed.clone()))
            .avatar_storage(Arc::new(storage.clone()))
            .identity(jwt.clone())
            .ranking(ranking)
            .avatar_max_bytes(avatar_max_bytes)
            .build()
            .expect("in-memory context");

        Self {
            ctx,
            backend,
            feed,
            storage,
            jwt,
        }
    }

    /// Access token for a user, signed by the fixture identity provider
    pub fn token_for(&self, user_id: UserId, full_name: &str) -> String {
        let metadata = UserMetadata {
            full_name: Some(full_name.to_string()),
            ..UserMetadata::default()
        };
        self.jwt
            .issue_access_token(user_id, None, metadata)
            .expect("token")
    }

    /// Sign in as `user_id`, replacing any current session
    pub async fn sign_in(&self, user_id: UserId) {
        let token = self.token_for(user_id, &format!("User {}", unique_suffix()));
        self.ctx
            .sessions()
            .sign_in(&token)
            .await
            .expect("sign in");
    }

    /// A fresh user that is signed in
    pub async fn new_user(&self) -> UserId {
        let user_id = UserId::random();
        self.sign_in(user_id).await;
        user_id
    }

    /// Store a post authored by `author` with zeroed counters
    pub async fn create_post(&self, author: UserId) -> Post {
        self.backend
            .create_and_clear_draft(&new_post(author))
            .await
            .expect("create post")
    }

    /// Posts authored by `count` distinct fresh users
    pub async fn create_posts(&self, count: usize) -> Vec<Post> {
        let mut posts = Vec::with_capacity(count);
        for _ in 0..count {
            posts.push(self.create_post(UserId::random()).await);
        }
        posts
    }

    /// Store a post with preset counters, created `minutes` after a fixed base time
    pub fn put_post(&self, id: i64, counts: (i64, i64, i64, i64), minutes: i64) -> Post {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let post = new_post(UserId::random()).into_post(PostId::new(id), base + Duration::minutes(minutes));
        let post = Post {
            counts: ReactionCounts {
                honor: counts.0,
                recommend: counts.1,
                respect: counts.2,
                hug: counts.3,
            },
            ..post
        };
        self.backend.put_post(post.clone());
        post
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Valid post fields for `author`
pub fn new_post(author: UserId) -> NewPost {
    NewPost::new(
        author,
        "listen before answering",
        "write the decision and the reason down so the next person knows",
        "celebrate finished work",
    )
    .expect("valid fields")
}

/// Draft request with only field A filled
pub fn draft_with_a(request_a: &str) -> SaveDraftRequest {
    SaveDraftRequest {
        request_a: Some(request_a.to_string()),
        ..SaveDraftRequest::default()
    }
}

/// Valid submission request
pub fn submit_request() -> SubmitPostRequest {
    SubmitPostRequest {
        request_a: "ask one more question".to_string(),
        request_b: "share what you learned with someone who was not in the room".to_string(),
        request_c: "rest when it is done".to_string(),
    }
}
