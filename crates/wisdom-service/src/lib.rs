//! # wisdom-service
//!
//! Application layer: the reaction ledger, aggregate counter and ranking
//! view, plus sessions, drafts, submissions and profiles. Every backend
//! capability is reached through the ports in `wisdom-core`.

pub mod dto;
pub mod services;

pub use dto::{
    PostResponse, SaveDraftRequest, SubmitPostRequest, TypeUsage, UpdateProfileRequest,
    UsageResponse,
};
pub use services::{
    AggregateCounter, DraftService, Liveness, PostService, ProfileService,
    RankingView, ReactionCache, ReactionLedger, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SessionManager, Subscription,
};
