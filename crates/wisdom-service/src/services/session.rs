//! Session manager
//!
//! Holds the signed-in session and broadcasts session changes. The reaction
//! cache belongs to the session and does not outlive it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument};
use wisdom_core::entities::Session;
use wisdom_core::traits::{IdentityProvider, ProfileRepository};
use wisdom_core::{DomainError, UserId};

use super::context::ReactionCache;
use super::error::ServiceResult;
use super::profile::ensure_profile;

/// Current session plus a change channel
#[derive(Clone)]
pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    state: Arc<watch::Sender<Option<Session>>>,
    reaction_cache: ReactionCache,
}

impl SessionManager {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            identity,
            profiles,
            state: Arc::new(state),
            reaction_cache: ReactionCache::default(),
        }
    }

    /// Establish a session from an access token.
    ///
    /// The first sign-in of a user also creates their profile.
    #[instrument(skip(self, access_token))]
    pub async fn sign_in(&self, access_token: &str) -> ServiceResult<Session> {
        let session = self.identity.verify(access_token)?;
        ensure_profile(self.profiles.as_ref(), &session).await?;

        info!(user_id = %session.user_id, "Signed in");
        let previous = self.state.send_replace(Some(session.clone()));
        if previous.is_some_and(|p| p.user_id != session.user_id) {
            self.reaction_cache.clear();
        }
        Ok(session)
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.state.send_replace(None) {
            info!(user_id = %previous.user_id, "Signed out");
        }
        self.reaction_cache.clear();
    }

    /// The current session, unless it has expired
    pub fn current(&self) -> Option<Session> {
        self.state
            .borrow()
            .as_ref()
            .filter(|session| !session.is_expired())
            .cloned()
    }

    /// Require a live session belonging to `user_id`
    pub fn require(&self, user_id: UserId) -> ServiceResult<Session> {
        match self.current() {
            Some(session) if session.user_id == user_id => Ok(session),
            _ => Err(DomainError::NotAuthenticated.into()),
        }
    }

    /// Receiver that observes every sign-in and sign-out
    pub fn changes(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    pub fn reaction_cache(&self) -> &ReactionCache {
        &self.reaction_cache
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("signed_in", &self.state.borrow().is_some())
            .finish()
    }
}
