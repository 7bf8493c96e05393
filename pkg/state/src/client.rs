use chrono::Utc;
use pkg_constants::state::REGISTRY_PREFIX;
use pkg_types::meta::ObjectKey;
use pkg_types::object::{Object, Spec};
use tracing::debug;
use uuid::Uuid;

use crate::store::{ObjectStore, StoreError, StoredObject};

/// Registry key of one object: `/registry/<plural>/[<namespace>/]<name>`.
pub fn registry_key<S: Spec>(key: &ObjectKey) -> String {
    if S::NAMESPACED {
        format!("{}/{}/{}/{}", REGISTRY_PREFIX, S::PLURAL, key.namespace, key.name)
    } else {
        format!("{}/{}/{}", REGISTRY_PREFIX, S::PLURAL, key.name)
    }
}

/// Key prefix covering every object of kind `S`, optionally within one namespace.
pub fn registry_prefix<S: Spec>(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if S::NAMESPACED => format!("{}/{}/{}/", REGISTRY_PREFIX, S::PLURAL, ns),
        _ => format!("{}/{}/", REGISTRY_PREFIX, S::PLURAL),
    }
}

/// Typed access to an [`ObjectStore`].
///
/// Objects are stored as JSON. The store's revision is surfaced as
/// `metadata.resource_version`, and `update` uses it as the concurrency token.
#[derive(Clone)]
pub struct Client<St> {
    store: St,
}

impl<St: ObjectStore> Client<St> {
    pub fn new(store: St) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Fetch an object, or `None` if it does not exist.
    pub async fn get<S: Spec>(&self, key: &ObjectKey) -> Result<Option<Object<S>>, StoreError> {
        let path = registry_key::<S>(key);
        match self.store.get(&path).await? {
            Some(stored) => decode(&path, stored).map(Some),
            None => Ok(None),
        }
    }

    /// All objects of kind `S`, optionally restricted to one namespace.
    pub async fn list<S: Spec>(&self, namespace: Option<&str>) -> Result<Vec<Object<S>>, StoreError> {
        let prefix = registry_prefix::<S>(namespace);
        self.store
            .list(&prefix)
            .await?
            .into_iter()
            .map(|(path, stored)| decode(&path, stored))
            .collect()
    }

    /// Like [`Client::list`], but decodes each document on its own so one
    /// malformed entry does not hide the others. Entries are `(registry key,
    /// decoded object)`.
    pub async fn list_each<S: Spec>(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<(String, Result<Object<S>, StoreError>)>, StoreError> {
        let prefix = registry_prefix::<S>(namespace);
        Ok(self
            .store
            .list(&prefix)
            .await?
            .into_iter()
            .map(|(path, stored)| {
                let decoded = decode(&path, stored);
                (path, decoded)
            })
            .collect())
    }

    /// Persist a new object. Assigns its uid and creation timestamp.
    pub async fn create<S: Spec>(&self, mut obj: Object<S>) -> Result<Object<S>, StoreError> {
        let path = registry_key::<S>(&obj.key());
        if obj.metadata.uid.is_empty() {
            obj.metadata.uid = Uuid::new_v4().to_string();
        }
        obj.metadata.created_at = Some(Utc::now());
        obj.metadata.resource_version = 0;

        let value = encode(&path, &obj)?;
        obj.metadata.resource_version = self.store.create(&path, value).await?;
        debug!("Created {} {} at revision {}", S::KIND, path, obj.metadata.resource_version);
        Ok(obj)
    }

    /// Replace an existing object. Fails with a conflict if it changed since
    /// `obj.metadata.resource_version` was read.
    pub async fn update<S: Spec>(&self, mut obj: Object<S>) -> Result<Object<S>, StoreError> {
        let path = registry_key::<S>(&obj.key());
        let expected = obj.metadata.resource_version;

        let value = encode(&path, &obj)?;
        obj.metadata.resource_version = self.store.update(&path, expected, value).await?;
        debug!("Updated {} {} at revision {}", S::KIND, path, obj.metadata.resource_version);
        Ok(obj)
    }
}

fn encode<S: Spec>(path: &str, obj: &Object<S>) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(obj).map_err(|source| StoreError::Codec {
        key: path.to_string(),
        source,
    })
}

fn decode<S: Spec>(path: &str, stored: StoredObject) -> Result<Object<S>, StoreError> {
    let mut obj: Object<S> =
        serde_json::from_value(stored.value).map_err(|source| StoreError::Codec {
            key: path.to_string(),
            source,
        })?;
    obj.metadata.resource_version = stored.resource_version;
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use pkg_types::namespace::NamespaceSpec;
    use pkg_types::quantity::Quantity;
    use pkg_types::quota::{ResourceQuota, ResourceQuotaSpec};

    fn quota(ns: &str, name: &str) -> ResourceQuota {
        let mut rq = ResourceQuota::new(&ObjectKey::namespaced(ns, name));
        rq.spec
            .hard
            .insert("pods".to_string(), Quantity::from_units(20));
        rq
    }

    #[test]
    fn registry_layout() {
        let key = ObjectKey::namespaced("proj-acme", "presslabs-dashboard");
        assert_eq!(
            registry_key::<ResourceQuotaSpec>(&key),
            "/registry/resourcequotas/proj-acme/presslabs-dashboard"
        );
        assert_eq!(
            registry_key::<NamespaceSpec>(&ObjectKey::cluster("proj-acme")),
            "/registry/namespaces/proj-acme"
        );
        assert_eq!(
            registry_prefix::<NamespaceSpec>(Some("ignored")),
            "/registry/namespaces/"
        );
    }

    #[tokio::test]
    async fn create_assigns_bookkeeping() {
        let client = Client::new(MemoryStore::new());
        let created = client.create(quota("proj-acme", "q")).await.unwrap();
        assert!(created.exists());
        assert!(!created.metadata.uid.is_empty());
        assert!(created.metadata.created_at.is_some());

        let fetched: ResourceQuota = client
            .get(&ObjectKey::namespaced("proj-acme", "q"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn missing_object_is_none() {
        let client = Client::new(MemoryStore::new());
        let got = client
            .get::<ResourceQuotaSpec>(&ObjectKey::namespaced("proj-acme", "q"))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn stale_update_is_a_retryable_conflict() {
        let client = Client::new(MemoryStore::new());
        let created = client.create(quota("proj-acme", "q")).await.unwrap();

        let mut first = created.clone();
        first.metadata.labels.insert("a".into(), "1".into());
        client.update(first).await.unwrap();

        let mut stale = created;
        stale.metadata.labels.insert("b".into(), "2".into());
        let err = client.update(stale).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn list_by_namespace() {
        let client = Client::new(MemoryStore::new());
        client.create(quota("proj-a", "q1")).await.unwrap();
        client.create(quota("proj-a", "q2")).await.unwrap();
        client.create(quota("proj-b", "q1")).await.unwrap();

        let in_a = client.list::<ResourceQuotaSpec>(Some("proj-a")).await.unwrap();
        assert_eq!(in_a.len(), 2);
        let all = client.list::<ResourceQuotaSpec>(None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn malformed_entry_is_isolated() {
        let client = Client::new(MemoryStore::new());
        client.create(quota("proj-a", "q1")).await.unwrap();
        client
            .store()
            .create("/registry/resourcequotas/proj-a/q2", serde_json::json!({"metadata": 5}))
            .await
            .unwrap();

        let err = client.list::<ResourceQuotaSpec>(None).await.unwrap_err();
        assert!(matches!(err, StoreError::Codec { .. }));

        let entries = client.list_each::<ResourceQuotaSpec>(None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1.as_ref().unwrap().metadata.name, "q1");
        assert_eq!(entries[1].0, "/registry/resourcequotas/proj-a/q2");
        assert!(matches!(entries[1].1, Err(StoreError::Codec { .. })));
    }
}
