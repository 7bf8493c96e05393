use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::meta::{ObjectKey, ObjectMeta, OwnerReference};

/// Describes one object kind: its spec payload, its status payload and how
/// it is addressed in the store.
pub trait Spec:
    Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Store-managed status. Never compared or written by reconcilers.
    type Status: Clone
        + Default
        + PartialEq
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    const API_VERSION: &'static str;
    const KIND: &'static str;
    /// Plural resource name, used as the registry path segment.
    const PLURAL: &'static str;
    const NAMESPACED: bool;
}

/// A stored object: metadata plus a kind-specific spec and status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Object<S: Spec> {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: S,
    #[serde(default)]
    pub status: S::Status,
}

impl<S: Spec> Object<S> {
    /// Zero-value object addressed by `key`.
    pub fn new(key: &ObjectKey) -> Self {
        Self {
            metadata: ObjectMeta::from_key(key),
            spec: S::default(),
            status: S::Status::default(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Whether the object has been persisted at least once.
    pub fn exists(&self) -> bool {
        self.metadata.resource_version > 0
    }

    /// Controller owner reference pointing at this object.
    pub fn controller_reference(&self) -> OwnerReference {
        OwnerReference {
            api_version: S::API_VERSION.to_string(),
            kind: S::KIND.to_string(),
            name: self.metadata.name.clone(),
            uid: self.metadata.uid.clone(),
            controller: true,
            block_owner_deletion: true,
        }
    }

    /// True when the fields a reconciler may own (labels, annotations,
    /// owner references and spec) are identical.
    pub fn desired_state_eq(&self, other: &Self) -> bool {
        self.metadata.labels == other.metadata.labels
            && self.metadata.annotations == other.metadata.annotations
            && self.metadata.owner_references == other.metadata.owner_references
            && self.spec == other.spec
    }
}
