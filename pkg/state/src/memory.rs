use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::store::{ObjectStore, StoreError, StoredObject};

/// In-process object store. Used by tests and single-binary setups.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
    writes: AtomicUsize,
}

#[derive(Default)]
struct MemoryInner {
    revision: u64,
    objects: BTreeMap<String, StoredObject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful creates and updates so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        Ok(self.inner.read().await.objects.get(key).cloned())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<(String, StoredObject)>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn create(&self, key: &str, value: serde_json::Value) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.objects.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        inner.revision += 1;
        let resource_version = inner.revision;
        inner.objects.insert(
            key.to_string(),
            StoredObject {
                resource_version,
                value,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(resource_version)
    }

    async fn update(
        &self,
        key: &str,
        expected_version: u64,
        value: serde_json::Value,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let actual = match inner.objects.get(key) {
            Some(existing) => existing.resource_version,
            None => return Err(StoreError::NotFound(key.to_string())),
        };
        if actual != expected_version {
            return Err(StoreError::Conflict {
                key: key.to_string(),
                expected: expected_version,
                actual,
            });
        }
        inner.revision += 1;
        let resource_version = inner.revision;
        inner.objects.insert(
            key.to_string(),
            StoredObject {
                resource_version,
                value,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(resource_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn versions_increase_across_keys() {
        let store = MemoryStore::new();
        let a = store.create("/a", json!({})).await.unwrap();
        let b = store.create("/b", json!({})).await.unwrap();
        let a2 = store.update("/a", a, json!({"x": 1})).await.unwrap();
        assert!(a < b && b < a2);
        assert_eq!(store.write_count(), 3);
    }

    #[tokio::test]
    async fn stale_update_conflicts() {
        let store = MemoryStore::new();
        let v1 = store.create("/a", json!({})).await.unwrap();
        store.update("/a", v1, json!({"x": 1})).await.unwrap();

        let err = store.update("/a", v1, json!({"x": 2})).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(err.is_retryable());
        assert_eq!(store.get("/a").await.unwrap().unwrap().value, json!({"x": 1}));
    }

    #[tokio::test]
    async fn create_and_update_preconditions() {
        let store = MemoryStore::new();
        store.create("/a", json!({})).await.unwrap();
        assert!(matches!(
            store.create("/a", json!({})).await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(matches!(
            store.update("/missing", 1, json!({})).await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn list_is_prefix_scoped() {
        let store = MemoryStore::new();
        store.create("/registry/a/1", json!(1)).await.unwrap();
        store.create("/registry/a/2", json!(2)).await.unwrap();
        store.create("/registry/b/1", json!(3)).await.unwrap();

        let keys: Vec<String> = store
            .list("/registry/a/")
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["/registry/a/1", "/registry/a/2"]);
    }
}
