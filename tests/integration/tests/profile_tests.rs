//! Session, profile and avatar tests
//!
//! Run with: cargo test -p integration-tests --test profile_tests

use integration_tests::*;
use wisdom_core::entities::Gender;
use wisdom_core::{ErrorKind, UserId};
use wisdom_service::{ProfileService, UpdateProfileRequest};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_first_sign_in_creates_profile_once() {
    let engine = TestEngine::new();
    let user = UserId::random();

    let token = engine.token_for(user, "Han Seojun");
    engine.ctx.sessions().sign_in(&token).await.unwrap();

    let profiles = ProfileService::new(&engine.ctx);
    profiles
        .update_profile(
            user,
            UpdateProfileRequest {
                display_name: Some("Seojun".to_string()),
                ..UpdateProfileRequest::default()
            },
        )
        .await
        .unwrap();

    // Signing in again must not reset the edited profile
    engine.ctx.sessions().sign_in(&token).await.unwrap();
    assert_eq!(profiles.get_profile(user).await.unwrap().display_name, "Seojun");

    let session = engine.ctx.sessions().current().unwrap();
    let ensured = profiles.ensure_profile(&session).await.unwrap();
    assert_eq!(ensured.display_name, "Seojun");
}

#[tokio::test]
async fn test_ensure_profile_creates_missing_profile() {
    let engine = TestEngine::new();
    let user = UserId::random();
    let token = engine.token_for(user, "Oh Jiwon");
    let session = engine.jwt.decode_token(&token).unwrap().into_session().unwrap();

    let profiles = ProfileService::new(&engine.ctx);
    assert_kind(profiles.get_profile(user).await, ErrorKind::NotFound);

    let created = profiles.ensure_profile(&session).await.unwrap();
    assert_eq!(created.display_name, "Oh Jiwon");
    assert_eq!(profiles.get_profile(user).await.unwrap(), created);
}

#[tokio::test]
async fn test_session_changes_are_observable() {
    let engine = TestEngine::new();
    let mut changes = engine.ctx.sessions().changes();

    let user = engine.new_user().await;
    assert!(changes.has_changed().unwrap());
    assert_eq!(
        changes.borrow_and_update().as_ref().map(|s| s.user_id),
        Some(user)
    );

    engine.ctx.sessions().sign_out();
    changes.changed().await.unwrap();
    assert!(changes.borrow().is_none());
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let engine = TestEngine::new();
    let err = engine.ctx.sessions().sign_in("not-a-token").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
}

// ============================================================================
// Profile edits
// ============================================================================

#[tokio::test]
async fn test_update_profile_fields() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let profiles = ProfileService::new(&engine.ctx);

    let updated = profiles
        .update_profile(
            user,
            UpdateProfileRequest {
                display_name: Some("  Yuna  ".to_string()),
                gender: Some("female".to_string()),
                age: Some(29),
                company: Some("Wisdom Labs".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Yuna");
    assert_eq!(updated.gender, Some(Gender::Female));
    assert_eq!(updated.age, Some(29));

    let cleared = profiles
        .update_profile(
            user,
            UpdateProfileRequest {
                company: Some(String::new()),
                ..UpdateProfileRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.company.is_none());
    assert_eq!(cleared.age, Some(29));
}

#[tokio::test]
async fn test_update_profile_validation() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let profiles = ProfileService::new(&engine.ctx);

    for request in [
        UpdateProfileRequest {
            age: Some(0),
            ..UpdateProfileRequest::default()
        },
        UpdateProfileRequest {
            display_name: Some("   ".to_string()),
            ..UpdateProfileRequest::default()
        },
        UpdateProfileRequest {
            gender: Some("robot".to_string()),
            ..UpdateProfileRequest::default()
        },
        UpdateProfileRequest {
            company: Some("c".repeat(51)),
            ..UpdateProfileRequest::default()
        },
    ] {
        assert_kind(
            profiles.update_profile(user, request).await,
            ErrorKind::ValidationFailed,
        );
    }
}

// ============================================================================
// Avatars
// ============================================================================

#[tokio::test]
async fn test_upload_avatar_replaces_previous_object() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let profiles = ProfileService::new(&engine.ctx);

    let first = profiles
        .upload_avatar(user, PNG_BYTES.to_vec(), "image/png")
        .await
        .unwrap();
    let second = profiles
        .upload_avatar(user, vec![1, 2, 3], "image/webp")
        .await
        .unwrap();

    assert_ne!(first, second);
    assert!(second.starts_with(AVATAR_BASE_URL));
    assert!(second.contains(&user.to_string()));
    assert!(second.ends_with(".webp"));
    assert_eq!(engine.storage.len(), 1);
    assert_eq!(
        profiles.get_profile(user).await.unwrap().avatar_url.as_deref(),
        Some(second.as_str())
    );
}

#[tokio::test]
async fn test_upload_avatar_rejects_bad_input() {
    let engine = TestEngine::with_avatar_limit(4);
    let user = engine.new_user().await;
    let profiles = ProfileService::new(&engine.ctx);

    assert_kind(
        profiles.upload_avatar(user, vec![1], "image/gif").await,
        ErrorKind::ValidationFailed,
    );
    assert_kind(
        profiles.upload_avatar(user, PNG_BYTES.to_vec(), "image/png").await,
        ErrorKind::ValidationFailed,
    );
    assert_kind(
        profiles.upload_avatar(user, Vec::new(), "image/png").await,
        ErrorKind::ValidationFailed,
    );
    assert!(engine.storage.is_empty());
}

#[tokio::test]
async fn test_remove_avatar() {
    let engine = TestEngine::new();
    let user = engine.new_user().await;
    let profiles = ProfileService::new(&engine.ctx);

    profiles
        .upload_avatar(user, PNG_BYTES.to_vec(), "image/jpeg")
        .await
        .unwrap();
    let profile = profiles.remove_avatar(user).await.unwrap();
    assert!(profile.avatar_url.is_none());
    assert!(engine.storage.is_empty());
}
