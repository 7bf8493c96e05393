use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A stored JSON document together with the revision at which it was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub resource_version: u64,
    pub value: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("conflict writing {key}: expected resource version {expected}, found {actual}")]
    Conflict {
        key: String,
        expected: u64,
        actual: u64,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode or decode {key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Errors that may clear up if the same operation is attempted again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Conflict { .. } | StoreError::AlreadyExists(_) | StoreError::Unavailable(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Keyed object store with optimistic concurrency.
///
/// Every successful write assigns a new, strictly larger resource version.
/// `update` only succeeds while the stored version still equals
/// `expected_version`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch a document, or `None` if it does not exist.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError>;

    /// All documents whose key starts with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<(String, StoredObject)>, StoreError>;

    /// Store a new document. Fails with `AlreadyExists` if `key` is taken.
    async fn create(&self, key: &str, value: serde_json::Value) -> Result<u64, StoreError>;

    /// Replace an existing document if it is still at `expected_version`.
    async fn update(
        &self,
        key: &str,
        expected_version: u64,
        value: serde_json::Value,
    ) -> Result<u64, StoreError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        (**self).get(key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<(String, StoredObject)>, StoreError> {
        (**self).list(prefix).await
    }

    async fn create(&self, key: &str, value: serde_json::Value) -> Result<u64, StoreError> {
        (**self).create(key, value).await
    }

    async fn update(
        &self,
        key: &str,
        expected_version: u64,
        value: serde_json::Value,
    ) -> Result<u64, StoreError> {
        (**self).update(key, expected_version, value).await
    }
}
