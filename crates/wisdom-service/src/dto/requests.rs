//! Request DTOs
//!
//! All request DTOs implement `Deserialize`. Profile edits are checked with
//! `Validate`; post fields are trimmed first, so their bounds live on
//! [`NewPost`].

use serde::Deserialize;
use validator::Validate;
use wisdom_core::entities::NewPost;
use wisdom_core::{DomainError, UserId};

// ============================================================================
// Draft / Submission Requests
// ============================================================================

/// Autosave of the three-field form; any field may still be blank
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDraftRequest {
    pub request_a: Option<String>,
    pub request_b: Option<String>,
    pub request_c: Option<String>,
}

/// Final submission; every field is required
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPostRequest {
    pub request_a: String,
    pub request_b: String,
    pub request_c: String,
}

impl SubmitPostRequest {
    /// Trim and bound-check the fields, the same way a saved draft is checked
    pub fn into_new_post(self, user_id: UserId) -> Result<NewPost, DomainError> {
        NewPost::new(user_id, &self.request_a, &self.request_b, &self.request_c)
    }
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Profile edit; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 20, message = "Display name must be 1-20 characters"))]
    pub display_name: Option<String>,

    /// "male", "female" or "other"
    pub gender: Option<String>,

    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: Option<u8>,

    /// Empty string clears the company
    #[validate(length(max = 50, message = "Company must be at most 50 characters"))]
    pub company: Option<String>,
}
