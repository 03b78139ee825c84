//! Table change events
//!
//! These events drive:
//! - Ranking view refreshes
//! - Invalidation of the client-side reaction cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{PostId, UserId};

/// Backend tables that emit change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Posts,
    Reactions,
    Drafts,
    Profiles,
}

impl Table {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Reactions => "reactions",
            Self::Drafts => "drafts",
            Self::Profiles => "profiles",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "posts" => Some(Self::Posts),
            "reactions" => Some(Self::Reactions),
            "drafts" => Some(Self::Drafts),
            "profiles" => Some(Self::Profiles),
            _ => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single row-level change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub table: Table,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub timestamp: DateTime<Utc>,
}

impl TableChange {
    pub fn new(table: Table, kind: ChangeKind) -> Self {
        Self {
            table,
            kind,
            post_id: None,
            user_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn post(kind: ChangeKind, post_id: PostId) -> Self {
        Self::new(Table::Posts, kind).with_post(post_id)
    }

    pub fn reaction(kind: ChangeKind, user_id: UserId, post_id: PostId) -> Self {
        Self::new(Table::Reactions, kind)
            .with_post(post_id)
            .with_user(user_id)
    }

    #[must_use]
    pub fn with_post(mut self, post_id: PostId) -> Self {
        self.post_id = Some(post_id);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Event type name, e.g. `POSTS_UPDATE`
    pub fn event_type(&self) -> String {
        let kind = match self.kind {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        };
        format!("{}_{kind}", self.table.as_str().to_ascii_uppercase())
    }
}
