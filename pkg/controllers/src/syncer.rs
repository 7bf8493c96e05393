use pkg_state::client::Client;
use pkg_state::store::{ObjectStore, StoreError};
use pkg_types::meta::{AlreadyOwnedError, ObjectKey, OwnerReference};
use pkg_types::object::{Object, Spec};
use std::fmt;
use tracing::{debug, info};

/// What a sync did to the stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    Unchanged,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Created => write!(f, "created"),
            SyncOutcome::Updated => write!(f, "updated"),
            SyncOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[derive(Debug)]
pub struct SyncResult<S: Spec> {
    pub outcome: SyncOutcome,
    /// The object as it is now stored.
    pub object: Object<S>,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{kind} {key}: owner {owner} has no uid")]
    InvalidOwner {
        kind: &'static str,
        key: ObjectKey,
        owner: String,
    },
    #[error("{kind} {key}: cannot compute desired state: {source:#}")]
    Mutation {
        kind: &'static str,
        key: ObjectKey,
        #[source]
        source: anyhow::Error,
    },
    #[error("{kind} {key}: {source}")]
    AlreadyOwned {
        kind: &'static str,
        key: ObjectKey,
        #[source]
        source: AlreadyOwnedError,
    },
    #[error("{kind} {key}: {source}")]
    Store {
        kind: &'static str,
        key: ObjectKey,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    /// Whether requeueing the same key may succeed without any other change
    /// (write conflicts, transient store failures).
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Store { source, .. } if source.is_retryable())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SyncError::Store { source, .. } if source.is_conflict())
    }
}

/// Desired state for one object owned by one owner.
///
/// `mutate` must be pure: it sets exactly the fields it owns, works on a
/// zero-value object, and `mutate(mutate(x)) == mutate(x)`.
pub trait ObjectSyncer: Send + Sync {
    type Spec: Spec;

    fn object_key(&self) -> ObjectKey;

    fn owner(&self) -> OwnerReference;

    fn mutate(&self, existing: Object<Self::Spec>) -> anyhow::Result<Object<Self::Spec>>;
}

/// Run `syncer` once against the store.
pub async fn sync_object<Y, St>(
    client: &Client<St>,
    syncer: &Y,
) -> Result<SyncResult<Y::Spec>, SyncError>
where
    Y: ObjectSyncer,
    St: ObjectStore,
{
    let key = syncer.object_key();
    sync(client, &syncer.owner(), &key, |existing| syncer.mutate(existing)).await
}

/// Create or update the object at `key` so it matches `mutate`'s desired state.
///
/// Performs one read and at most one write. Nothing is written when `mutate`
/// fails or when the owned fields come out unchanged. Write conflicts are
/// returned to the caller, never retried here.
pub async fn sync<S, St, F>(
    client: &Client<St>,
    owner: &OwnerReference,
    key: &ObjectKey,
    mutate: F,
) -> Result<SyncResult<S>, SyncError>
where
    S: Spec,
    St: ObjectStore,
    F: FnOnce(Object<S>) -> anyhow::Result<Object<S>>,
{
    let kind = S::KIND;
    if owner.uid.is_empty() {
        return Err(SyncError::InvalidOwner {
            kind,
            key: key.clone(),
            owner: format!("{} {}", owner.kind, owner.name),
        });
    }
    let store_err = |source: StoreError| SyncError::Store {
        kind,
        key: key.clone(),
        source,
    };

    let before = client
        .get::<S>(key)
        .await
        .map_err(store_err)?
        .unwrap_or_else(|| Object::new(key));

    let mut after = mutate(before.clone()).map_err(|source| SyncError::Mutation {
        kind,
        key: key.clone(),
        source,
    })?;

    // Identity, bookkeeping and status belong to the store.
    after.metadata.name = before.metadata.name.clone();
    after.metadata.namespace = before.metadata.namespace.clone();
    after.metadata.uid = before.metadata.uid.clone();
    after.metadata.resource_version = before.metadata.resource_version;
    after.metadata.created_at = before.metadata.created_at;
    after.status = before.status.clone();

    after
        .metadata
        .set_controller_reference(owner.clone())
        .map_err(|source| SyncError::AlreadyOwned {
            kind,
            key: key.clone(),
            source,
        })?;

    if !before.exists() {
        let object = client.create(after).await.map_err(store_err)?;
        info!("{} {}: {}", kind, key, SyncOutcome::Created);
        return Ok(SyncResult {
            outcome: SyncOutcome::Created,
            object,
        });
    }

    if before.desired_state_eq(&after) {
        debug!("{} {}: {}", kind, key, SyncOutcome::Unchanged);
        return Ok(SyncResult {
            outcome: SyncOutcome::Unchanged,
            object: before,
        });
    }

    let object = client.update(after).await.map_err(store_err)?;
    info!("{} {}: {}", kind, key, SyncOutcome::Updated);
    Ok(SyncResult {
        outcome: SyncOutcome::Updated,
        object,
    })
}
