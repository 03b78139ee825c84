//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{PostId, ReactionType, UserId};

/// Coarse error categories surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAuthenticated,
    ValidationFailed,
    SelfReaction,
    QuotaExceeded,
    CancellationLocked,
    NotFound,
    Conflict,
    NetworkFailure,
    ServerFailure,
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication
    // =========================================================================
    #[error("Not authenticated")]
    NotAuthenticated,

    // =========================================================================
    // Validation
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationFailed(String),

    // =========================================================================
    // Reaction rules
    // =========================================================================
    #[error("Cannot react to your own post")]
    SelfReaction,

    #[error("Reaction quota exceeded for {reaction_type} (limit {limit})")]
    QuotaExceeded {
        reaction_type: ReactionType,
        limit: u32,
    },

    #[error("Reactions are locked after reaching the total limit")]
    CancellationLocked,

    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Reaction not found on post {post_id}")]
    ReactionNotFound { post_id: PostId },

    #[error("Profile not found: {0}")]
    ProfileNotFound(UserId),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    // =========================================================================
    // Conflict
    // =========================================================================
    #[error("Post already submitted")]
    AlreadySubmitted,

    #[error("Conflict: {0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure (wrapped)
    // =========================================================================
    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    ServerFailure(String),
}

impl DomainError {
    pub fn quota_exceeded(reaction_type: ReactionType) -> Self {
        Self::QuotaExceeded {
            reaction_type,
            limit: reaction_type.limit(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::SelfReaction => ErrorKind::SelfReaction,
            Self::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Self::CancellationLocked => ErrorKind::CancellationLocked,
            Self::PostNotFound(_)
            | Self::ReactionNotFound { .. }
            | Self::ProfileNotFound(_)
            | Self::ObjectNotFound(_) => ErrorKind::NotFound,
            Self::AlreadySubmitted | Self::Conflict(_) => ErrorKind::Conflict,
            Self::NetworkFailure(_) => ErrorKind::NetworkFailure,
            Self::DatabaseError(_) | Self::StorageError(_) | Self::ServerFailure(_) => {
                ErrorKind::ServerFailure
            }
        }
    }

    /// Get an error code string for the UI
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::SelfReaction => "SELF_REACTION",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::CancellationLocked => "CANCELLATION_LOCKED",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::ReactionNotFound { .. } => "UNKNOWN_REACTION",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::ObjectNotFound(_) => "UNKNOWN_OBJECT",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::Conflict(_) => "CONFLICT",
            Self::NetworkFailure(_) => "NETWORK_FAILURE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::ServerFailure(_) => "SERVER_FAILURE",
        }
    }

    /// Message safe to show to the user; backend detail is never included
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::ServerFailure => {
                "Something went wrong. Please try again later.".to_string()
            }
            ErrorKind::NetworkFailure => {
                "Connection problem. Check your network and try again.".to_string()
            }
            ErrorKind::NotAuthenticated => "Please sign in to continue.".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::ValidationFailed
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Reaction rule violations (self reaction, quota, lock)
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::SelfReaction | ErrorKind::QuotaExceeded | ErrorKind::CancellationLocked
        )
    }

    /// Errors the UI answers with a retry or re-authenticate prompt
    pub fn is_recoverable_prompt(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotAuthenticated | ErrorKind::NetworkFailure
        )
    }
}
