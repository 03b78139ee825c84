//! Response DTOs
//!
//! All response DTOs implement `Serialize` for the UI layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wisdom_core::entities::{Post, ReactionUsage};
use wisdom_core::{PostId, ReactionType, UserId, TOTAL_REACTION_LIMIT};

// ============================================================================
// Reaction Responses
// ============================================================================

/// Usage of one reaction type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeUsage {
    pub reaction_type: ReactionType,
    pub count: u32,
    pub limit: u32,
    pub can_send: bool,
}

/// A user's reaction usage across all posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageResponse {
    pub types: Vec<TypeUsage>,
    pub total: u32,
    pub total_limit: u32,
    pub locked: bool,
}

impl UsageResponse {
    pub fn get(&self, reaction_type: ReactionType) -> Option<&TypeUsage> {
        self.types
            .iter()
            .find(|usage| usage.reaction_type == reaction_type)
    }
}

impl From<ReactionUsage> for UsageResponse {
    fn from(usage: ReactionUsage) -> Self {
        Self {
            types: ReactionType::ALL
                .iter()
                .map(|kind| TypeUsage {
                    reaction_type: *kind,
                    count: usage.count(*kind),
                    limit: kind.limit(),
                    can_send: usage.can_send(*kind),
                })
                .collect(),
            total: usage.total(),
            total_limit: TOTAL_REACTION_LIMIT,
            locked: usage.is_locked(),
        }
    }
}

// ============================================================================
// Post Responses
// ============================================================================

/// Post with its weighted display score
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: PostId,
    pub user_id: UserId,
    pub request_a: String,
    pub request_b: String,
    pub request_c: String,
    pub honor_count: i64,
    pub recommend_count: i64,
    pub respect_count: i64,
    pub hug_count: i64,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            request_a: post.request_a.clone(),
            request_b: post.request_b.clone(),
            request_c: post.request_c.clone(),
            honor_count: post.counts.honor,
            recommend_count: post.counts.recommend,
            respect_count: post.counts.respect,
            hug_count: post.counts.hug,
            score: post.score(),
            created_at: post.created_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self::from(&post)
    }
}
