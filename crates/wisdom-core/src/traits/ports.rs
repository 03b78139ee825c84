//! Non-row backend capabilities: identity, change notifications, object storage

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::entities::Session;
use crate::events::{Table, TableChange};
use crate::traits::RepoResult;

/// Stream of change events; dropping it unsubscribes
pub type ChangeStream = BoxStream<'static, TableChange>;

/// Verifies access tokens issued by the identity provider
pub trait IdentityProvider: Send + Sync {
    /// Turn an access token into a session, or fail with `NotAuthenticated`
    fn verify(&self, access_token: &str) -> RepoResult<Session>;
}

/// Table-level change notification channel
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Publish a change; delivery is best-effort
    async fn publish(&self, change: &TableChange) -> RepoResult<()>;

    /// Subscribe to changes of one table
    async fn subscribe(&self, table: Table) -> RepoResult<ChangeStream>;
}

/// Object storage bucket for avatar images, addressed by `{user_id}/...` paths
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Upload an object, overwriting any existing object at `path`
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<()>;

    /// List object paths under a prefix
    async fn list(&self, prefix: &str) -> RepoResult<Vec<String>>;

    /// Delete objects; missing paths are ignored
    async fn delete(&self, paths: &[String]) -> RepoResult<()>;

    /// Public URL of an object
    fn public_url(&self, path: &str) -> String;
}
