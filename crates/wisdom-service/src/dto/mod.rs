//! Data transfer objects
//!
//! - Request DTOs with validation for engine inputs
//! - Response DTOs for serializing engine outputs

pub mod requests;
pub mod responses;

pub use requests::{SaveDraftRequest, SubmitPostRequest, UpdateProfileRequest};
pub use responses::{PostResponse, TypeUsage, UsageResponse};
