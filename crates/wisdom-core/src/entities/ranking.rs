//! Ranking - derived leaderboard entries, never persisted

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::entities::{Post, Profile, DEFAULT_DISPLAY_NAME};

/// Author display data joined into a ranking entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
}

impl AuthorSummary {
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        match profile {
            Some(p) => Self {
                display_name: p.display_name.clone(),
                avatar_url: p.avatar_url.clone(),
                company: p.company.clone(),
            },
            None => Self {
                display_name: DEFAULT_DISPLAY_NAME.to_string(),
                avatar_url: None,
                company: None,
            },
        }
    }
}

/// A post with its 1-based leaderboard position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub post: Post,
    pub author: AuthorSummary,
}

/// Leaderboard order: honor, recommend, respect (all descending), then
/// earlier `created_at`, then lower id. Total over distinct posts.
pub fn ranking_order(a: &Post, b: &Post) -> Ordering {
    b.counts
        .honor
        .cmp(&a.counts.honor)
        .then_with(|| b.counts.recommend.cmp(&a.counts.recommend))
        .then_with(|| b.counts.respect.cmp(&a.counts.respect))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort posts into leaderboard order and number them from 1
pub fn assign_ranks(mut posts: Vec<Post>) -> Vec<(u32, Post)> {
    posts.sort_by(ranking_order);
    posts
        .into_iter()
        .enumerate()
        .map(|(index, post)| (index as u32 + 1, post))
        .collect()
}
