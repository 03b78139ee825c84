//! Profile service
//!
//! Profile reads and edits, plus avatar upload to object storage. Avatar
//! objects live under the owner's `{user_id}/` prefix.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;
use wisdom_core::entities::{Gender, Profile, Session};
use wisdom_core::events::{ChangeKind, Table, TableChange};
use wisdom_core::traits::ProfileRepository;
use wisdom_core::{DomainError, UserId};

use crate::dto::UpdateProfileRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Accepted avatar content types and the file extension stored for each
const AVATAR_TYPES: [(&str, &str); 3] = [
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
];

/// Create the default profile for a session's user unless one exists.
///
/// An existing profile is returned untouched, edits included.
pub(super) async fn ensure_profile(
    profiles: &dyn ProfileRepository,
    session: &Session,
) -> ServiceResult<Profile> {
    Ok(profiles
        .insert_if_absent(&Profile::new(session.user_id, &session.names))
        .await?)
}

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the default profile for a session's user unless one exists.
    ///
    /// Sign-in runs the same step.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn ensure_profile(&self, session: &Session) -> ServiceResult<Profile> {
        ensure_profile(self.ctx.profile_repo(), session).await
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: UserId) -> ServiceResult<Profile> {
        Ok(self
            .ctx
            .profile_repo()
            .find(user_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(user_id))?)
    }

    /// Apply a profile edit; absent request fields keep their value
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> ServiceResult<Profile> {
        self.ctx.sessions().require(user_id)?;
        request.validate()?;

        let mut profile = self.get_profile(user_id).await?;

        if let Some(name) = request.display_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ServiceError::validation("Display name must be 1-20 characters"));
            }
            profile.display_name = name.to_string();
        }
        if let Some(gender) = request.gender {
            profile.gender = Some(
                gender
                    .parse::<Gender>()
                    .map_err(ServiceError::validation)?,
            );
        }
        if let Some(age) = request.age {
            profile.age = Some(age);
        }
        if let Some(company) = request.company {
            let company = company.trim();
            profile.company = (!company.is_empty()).then(|| company.to_string());
        }
        profile.updated_at = Utc::now();

        self.ctx.profile_repo().update(&profile).await?;
        self.publish_update(user_id).await;

        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }

    /// Replace the user's avatar and return its public URL
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_avatar(
        &self,
        user_id: UserId,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<String> {
        self.ctx.sessions().require(user_id)?;

        let extension = avatar_extension(content_type).ok_or_else(|| {
            ServiceError::validation("Avatar must be a PNG, JPEG or WebP image")
        })?;
        if bytes.is_empty() {
            return Err(ServiceError::validation("Avatar file is empty"));
        }
        let max = self.ctx.avatar_max_bytes();
        if bytes.len() > max {
            return Err(ServiceError::validation(format!(
                "Avatar must be at most {} KB",
                max / 1024
            )));
        }

        let mut profile = self.get_profile(user_id).await?;
        self.delete_avatar_objects(user_id).await?;

        let path = format!(
            "{user_id}/avatar-{}.{extension}",
            Utc::now().timestamp_millis()
        );
        let storage = self.ctx.avatar_storage();
        storage.upload(&path, bytes, content_type).await?;
        let url = storage.public_url(&path);

        profile.set_avatar_url(Some(url.clone()));
        self.ctx.profile_repo().update(&profile).await?;
        self.publish_update(user_id).await;

        info!(user_id = %user_id, path = %path, "Avatar uploaded");
        Ok(url)
    }

    /// Delete the user's avatar objects and clear the profile URL
    #[instrument(skip(self))]
    pub async fn remove_avatar(&self, user_id: UserId) -> ServiceResult<Profile> {
        self.ctx.sessions().require(user_id)?;

        let mut profile = self.get_profile(user_id).await?;
        self.delete_avatar_objects(user_id).await?;

        profile.set_avatar_url(None);
        self.ctx.profile_repo().update(&profile).await?;
        self.publish_update(user_id).await;

        info!(user_id = %user_id, "Avatar removed");
        Ok(profile)
    }

    async fn delete_avatar_objects(&self, user_id: UserId) -> ServiceResult<()> {
        let storage = self.ctx.avatar_storage();
        let existing = storage.list(&format!("{user_id}/")).await?;
        if !existing.is_empty() {
            storage.delete(&existing).await?;
        }
        Ok(())
    }

    async fn publish_update(&self, user_id: UserId) {
        self.ctx
            .publish(TableChange::new(Table::Profiles, ChangeKind::Update).with_user(user_id))
            .await;
    }
}

fn avatar_extension(content_type: &str) -> Option<&'static str> {
    let content_type = content_type.trim().to_ascii_lowercase();
    AVATAR_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, extension)| *extension)
}
