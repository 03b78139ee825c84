//! In-memory avatar bucket

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use wisdom_core::traits::{AvatarStorage, RepoResult};

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage held in a map keyed by path
#[derive(Debug, Clone)]
pub struct InMemoryAvatarStorage {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
    public_base: String,
}

impl InMemoryAvatarStorage {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            objects: Arc::default(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl Default for InMemoryAvatarStorage {
    fn default() -> Self {
        Self::new("memory://avatars")
    }
}

#[async_trait]
impl AvatarStorage for InMemoryAvatarStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<()> {
        self.objects.write().insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn list(&self, prefix: &str) -> RepoResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete(&self, paths: &[String]) -> RepoResult<()> {
        let mut objects = self.objects.write();
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.public_base)
    }
}
