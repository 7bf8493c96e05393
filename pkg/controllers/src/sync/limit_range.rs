use pkg_constants::limits;
use pkg_types::limit_range::{LimitRange, LimitRangeItem, LimitRangeSpec, LimitType};
use pkg_types::meta::{ObjectKey, OwnerReference, merge_labels};
use pkg_types::quantity::Quantity;
use pkg_types::quota::ResourceList;

use crate::component::Component;
use crate::projectns::ProjectNamespace;
use crate::syncer::ObjectSyncer;

/// Reconciles the per-container defaults of a project namespace.
pub struct LimitRangeSyncer<'a> {
    namespace: &'a ProjectNamespace,
}

impl<'a> LimitRangeSyncer<'a> {
    pub fn new(namespace: &'a ProjectNamespace) -> Self {
        Self { namespace }
    }
}

fn cpu_memory(cpu_millis: i64, memory_mib: i64) -> ResourceList {
    ResourceList::from([
        ("cpu".to_string(), Quantity::from_millis(cpu_millis)),
        ("memory".to_string(), Quantity::from_mebibytes(memory_mib)),
    ])
}

impl ObjectSyncer for LimitRangeSyncer<'_> {
    type Spec = LimitRangeSpec;

    fn object_key(&self) -> ObjectKey {
        ObjectKey::namespaced(
            self.namespace.name(),
            self.namespace.component_name(Component::LimitRange),
        )
    }

    fn owner(&self) -> OwnerReference {
        self.namespace.owner_reference()
    }

    fn mutate(&self, mut lr: LimitRange) -> anyhow::Result<LimitRange> {
        let labels = self.namespace.component_labels(Component::LimitRange);
        lr.metadata.labels = merge_labels(&lr.metadata.labels, &labels);
        lr.spec.limits = vec![LimitRangeItem {
            limit_type: LimitType::Container,
            default: cpu_memory(
                limits::DEFAULT_CONTAINER_CPU_LIMIT_MILLIS,
                limits::DEFAULT_CONTAINER_MEMORY_LIMIT_MIB,
            ),
            default_request: cpu_memory(
                limits::DEFAULT_CONTAINER_CPU_REQUEST_MILLIS,
                limits::DEFAULT_CONTAINER_MEMORY_REQUEST_MIB,
            ),
            ..Default::default()
        }];
        Ok(lr)
    }
}
