//! Profile entity <-> model mapper
//!
//! Display name normalization happens here, once, so every profile that
//! leaves the data layer carries a single usable name.

use wisdom_core::entities::{normalize_display_name, Gender, Profile, ProfileNames};
use wisdom_core::value_objects::UserId;

use crate::models::ProfileModel;

/// Convert ProfileModel to Profile entity
impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        let names = ProfileNames {
            username: model.username,
            display_name: model.display_name,
            full_name: model.full_name,
        };
        Profile {
            user_id: UserId::new(model.user_id),
            display_name: normalize_display_name(&names),
            gender: model.gender.as_deref().and_then(|g| g.parse::<Gender>().ok()),
            age: model.age.and_then(|a| u8::try_from(a).ok()),
            company: model.company,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
