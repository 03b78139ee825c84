//! Avatar storage on the local filesystem
//!
//! Objects are files under a root directory; their public URL is the
//! configured base URL joined with the object path (served by whatever
//! static file host fronts the directory).

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

use wisdom_core::error::DomainError;
use wisdom_core::traits::{AvatarStorage, RepoResult};

/// Filesystem-backed [`AvatarStorage`]
#[derive(Debug, Clone)]
pub struct LocalAvatarStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalAvatarStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve an object path below the root, refusing anything that escapes it
    fn resolve(&self, path: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(path);
        let normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !normal {
            return Err(DomainError::validation(format!("invalid object path: {path}")));
        }
        Ok(self.root.join(relative))
    }
}

fn storage_error(e: &std::io::Error) -> DomainError {
    DomainError::StorageError(e.to_string())
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(&e))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| storage_error(&e))?;
        debug!(path, content_type, "Avatar object written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, prefix: &str) -> RepoResult<Vec<String>> {
        // Prefixes are `{user_id}/`; list that directory
        let dir = prefix.trim_end_matches('/');
        let dir_path = self.resolve(dir)?;
        let mut entries = match tokio::fs::read_dir(&dir_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| storage_error(&e))? {
            if let Some(name) = entry.file_name().to_str() {
                paths.push(format!("{dir}/{name}"));
            }
        }
        paths.sort();
        Ok(paths)
    }

    #[instrument(skip(self))]
    async fn delete(&self, paths: &[String]) -> RepoResult<()> {
        for path in paths {
            let target = self.resolve(path)?;
            match tokio::fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(storage_error(&e)),
            }
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.public_base)
    }
}
