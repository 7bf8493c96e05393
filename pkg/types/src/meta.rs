use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one stored object. Cluster-scoped objects have an empty namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Back-link from a child object to the entity that owns it.
/// Deleting the owner lets the store garbage-collect the child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(default)]
    pub controller: bool,
    #[serde(default)]
    pub block_owner_deletion: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("object is already controlled by {kind} {name} (uid {uid})")]
pub struct AlreadyOwnedError {
    pub kind: String,
    pub name: String,
    pub uid: String,
}

/// Metadata common to every stored object.
///
/// `uid`, `resource_version` and `created_at` are bookkeeping owned by the
/// store; reconcilers only ever touch labels, annotations and owner references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default)]
    pub uid: String,
    /// Optimistic-concurrency token. Zero means "never stored".
    #[serde(default)]
    pub resource_version: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    pub fn from_key(key: &ObjectKey) -> Self {
        Self {
            name: key.name.clone(),
            namespace: key.namespace.clone(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::namespaced(self.namespace.clone(), self.name.clone())
    }

    /// Point the controller owner reference at `owner`.
    ///
    /// A reference with the same uid is replaced in place, so calling this
    /// repeatedly never grows the list. Fails if another controller already
    /// owns the object.
    pub fn set_controller_reference(
        &mut self,
        owner: OwnerReference,
    ) -> Result<(), AlreadyOwnedError> {
        if let Some(other) = self
            .owner_references
            .iter()
            .find(|r| r.controller && r.uid != owner.uid)
        {
            return Err(AlreadyOwnedError {
                kind: other.kind.clone(),
                name: other.name.clone(),
                uid: other.uid.clone(),
            });
        }

        match self.owner_references.iter_mut().find(|r| r.uid == owner.uid) {
            Some(existing) => *existing = owner,
            None => self.owner_references.push(owner),
        }
        Ok(())
    }
}

/// Overlay `overlay` onto `base`; keys present in both take the overlay value.
pub fn merge_labels(
    base: &BTreeMap<String, String>,
    overlay: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(uid: &str) -> OwnerReference {
        OwnerReference {
            api_version: "v1".into(),
            kind: "Namespace".into(),
            name: "proj-acme".into(),
            uid: uid.into(),
            controller: true,
            block_owner_deletion: true,
        }
    }

    #[test]
    fn controller_reference_is_not_duplicated() {
        let mut meta = ObjectMeta::default();
        meta.set_controller_reference(owner("u1")).unwrap();
        meta.set_controller_reference(owner("u1")).unwrap();
        assert_eq!(meta.owner_references, vec![owner("u1")]);
    }

    #[test]
    fn foreign_controller_is_rejected() {
        let mut meta = ObjectMeta::default();
        meta.set_controller_reference(owner("u1")).unwrap();
        let err = meta.set_controller_reference(owner("u2")).unwrap_err();
        assert_eq!(err.uid, "u1");
        assert_eq!(meta.owner_references.len(), 1);
    }

    #[test]
    fn non_controller_references_are_kept() {
        let mut meta = ObjectMeta::default();
        let mut plain = owner("other");
        plain.controller = false;
        meta.owner_references.push(plain.clone());
        meta.set_controller_reference(owner("u1")).unwrap();
        assert_eq!(meta.owner_references, vec![plain, owner("u1")]);
    }

    #[test]
    fn merge_prefers_overlay() {
        let base = BTreeMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "1".to_string()),
        ]);
        let overlay = BTreeMap::from([("b".to_string(), "2".to_string())]);
        let merged = merge_labels(&base, &overlay);
        assert_eq!(merged["a"], "1");
        assert_eq!(merged["b"], "2");
    }

    #[test]
    fn key_display() {
        assert_eq!(ObjectKey::cluster("proj-acme").to_string(), "proj-acme");
        assert_eq!(
            ObjectKey::namespaced("proj-acme", "presslabs-dashboard").to_string(),
            "proj-acme/presslabs-dashboard"
        );
    }
}
