use async_trait::async_trait;
use slatedb::Db;
use slatedb::object_store::local::LocalFileSystem;
use slatedb::object_store::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use pkg_constants::state::VERSION_COUNTER_KEY;

use crate::store::{ObjectStore, StoreError, StoredObject};

/// Persistent object store backed by SlateDB on a local filesystem.
/// In production this would use S3/R2/MinIO via the `object_store` crate.
///
/// SlateDB has no compare-and-swap, so every write runs under `write_lock`:
/// the version check, the revision bump and the put happen as one step.
#[derive(Clone)]
pub struct SlateStore {
    db: Db,
    write_lock: Arc<Mutex<()>>,
}

fn unavailable(op: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("SlateDB {} failed: {}", op, e))
}

impl SlateStore {
    /// Open (or create) a store rooted at `path` on the local filesystem.
    pub async fn open(path: &str) -> anyhow::Result<Self> {
        info!("Opening SlateDB object store at {}", path);

        // Ensure the data directory exists before opening the object store
        std::fs::create_dir_all(path)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory {}: {}", path, e))?;

        let object_store = Arc::new(
            LocalFileSystem::new_with_prefix(path)
                .map_err(|e| anyhow::anyhow!("Failed to create local object store: {}", e))?,
        );
        let db = Db::open(Path::from("/"), object_store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open SlateDB: {}", e))?;
        Ok(Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Gracefully close the store.
    pub async fn close(self) -> anyhow::Result<()> {
        info!("Closing SlateDB object store");
        self.db
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB close failed: {}", e))
    }

    async fn read(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        match self.db.get(key.as_bytes()).await {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| StoreError::Codec {
                    key: key.to_string(),
                    source,
                }),
            Ok(None) => Ok(None),
            Err(e) => Err(unavailable("get", e)),
        }
    }

    /// Bump the global revision counter. Caller must hold `write_lock`.
    async fn next_revision(&self) -> Result<u64, StoreError> {
        let current = match self.db.get(VERSION_COUNTER_KEY.as_bytes()).await {
            Ok(Some(bytes)) => {
                let buf = <[u8; 8]>::try_from(&bytes[..]).map_err(|_| {
                    StoreError::Unavailable(format!(
                        "revision counter {} is corrupt ({} bytes)",
                        VERSION_COUNTER_KEY,
                        bytes.len()
                    ))
                })?;
                u64::from_be_bytes(buf)
            }
            Ok(None) => 0,
            Err(e) => return Err(unavailable("get", e)),
        };
        let next = current + 1;
        self.db
            .put(VERSION_COUNTER_KEY.as_bytes(), &next.to_be_bytes())
            .await
            .map_err(|e| unavailable("put", e))?;
        Ok(next)
    }

    async fn write(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<u64, StoreError> {
        let resource_version = self.next_revision().await?;
        let record = StoredObject {
            resource_version,
            value,
        };
        let data = serde_json::to_vec(&record).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.db
            .put(key.as_bytes(), &data)
            .await
            .map_err(|e| unavailable("put", e))?;
        debug!("SlateDB wrote {} at revision {}", key, resource_version);
        Ok(resource_version)
    }
}

#[async_trait]
impl ObjectStore for SlateStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        self.read(key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<(String, StoredObject)>, StoreError> {
        let mut results = Vec::new();
        let mut iter = self
            .db
            .scan_prefix(prefix.as_bytes())
            .await
            .map_err(|e| unavailable("scan_prefix", e))?;

        while let Some(kv) = iter.next().await.map_err(|e| unavailable("scan", e))? {
            let key = String::from_utf8_lossy(&kv.key).to_string();
            let record = serde_json::from_slice(&kv.value).map_err(|source| StoreError::Codec {
                key: key.clone(),
                source,
            })?;
            results.push((key, record));
        }
        Ok(results)
    }

    async fn create(&self, key: &str, value: serde_json::Value) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.read(key).await?.is_some() {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        self.write(key, value).await
    }

    async fn update(
        &self,
        key: &str,
        expected_version: u64,
        value: serde_json::Value,
    ) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;
        let actual = match self.read(key).await? {
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
        self.write(key, value).await
    }
}
