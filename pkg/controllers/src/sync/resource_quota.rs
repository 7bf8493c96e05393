use anyhow::Context;
use pkg_constants::quota as defaults;
use pkg_types::meta::{ObjectKey, OwnerReference, merge_labels};
use pkg_types::quantity::Quantity;
use pkg_types::quota::{QuotaResource, ResourceList, ResourceQuota, ResourceQuotaSpec};
use std::collections::BTreeMap;

use crate::component::Component;
use crate::projectns::ProjectNamespace;
use crate::syncer::ObjectSyncer;

/// The platform-wide quota floor, one quantity per [`QuotaResource`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaDefaults {
    floor: [Quantity; 5],
}

impl Default for QuotaDefaults {
    fn default() -> Self {
        Self {
            floor: [
                Quantity::from_units(defaults::DEFAULT_REQUESTS_CPU_CORES),
                Quantity::from_gibibytes(defaults::DEFAULT_REQUESTS_MEMORY_GIB),
                Quantity::from_units(defaults::DEFAULT_LIMITS_CPU_CORES),
                Quantity::from_gibibytes(defaults::DEFAULT_LIMITS_MEMORY_GIB),
                Quantity::from_units(defaults::DEFAULT_PODS),
            ],
        }
    }
}

impl QuotaDefaults {
    /// Built-in floor with operator overrides applied (resource name → quantity).
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> anyhow::Result<Self> {
        let mut quota = Self::default();
        for (name, value) in overrides {
            let resource = QuotaResource::from_name(name)
                .with_context(|| format!("unknown quota resource '{}'", name))?;
            let quantity: Quantity = value
                .parse()
                .with_context(|| format!("invalid default for quota resource '{}'", name))?;
            quota.floor[resource as usize] = quantity;
        }
        Ok(quota)
    }

    pub fn get(&self, resource: QuotaResource) -> &Quantity {
        &self.floor[resource as usize]
    }

    /// Effective hard limits given what is currently stored.
    ///
    /// Per resource, an existing value wins only when strictly greater than
    /// the default; equal or smaller values fall back to the default. Resources
    /// outside [`QuotaResource::ALL`] are dropped.
    pub fn merge(&self, existing: &ResourceList) -> ResourceList {
        QuotaResource::ALL
            .into_iter()
            .map(|resource| {
                let floor = self.get(resource);
                let effective = match existing.get(resource.as_str()) {
                    Some(current) if current > floor => current,
                    _ => floor,
                };
                (resource.as_str().to_string(), effective.clone())
            })
            .collect()
    }
}

/// Reconciles the project namespace's ResourceQuota.
pub struct ResourceQuotaSyncer<'a> {
    namespace: &'a ProjectNamespace,
    defaults: &'a QuotaDefaults,
}

impl<'a> ResourceQuotaSyncer<'a> {
    pub fn new(namespace: &'a ProjectNamespace, defaults: &'a QuotaDefaults) -> Self {
        Self {
            namespace,
            defaults,
        }
    }
}

impl ObjectSyncer for ResourceQuotaSyncer<'_> {
    type Spec = ResourceQuotaSpec;

    fn object_key(&self) -> ObjectKey {
        ObjectKey::namespaced(
            self.namespace.name(),
            self.namespace.component_name(Component::ResourceQuota),
        )
    }

    fn owner(&self) -> OwnerReference {
        self.namespace.owner_reference()
    }

    fn mutate(&self, mut rq: ResourceQuota) -> anyhow::Result<ResourceQuota> {
        let labels = self.namespace.component_labels(Component::ResourceQuota);
        rq.metadata.labels = merge_labels(&rq.metadata.labels, &labels);
        rq.spec.hard = self.defaults.merge(&rq.spec.hard);
        Ok(rq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::labels::MetadataKeys;
    use pkg_types::namespace::Namespace;
    use std::sync::Arc;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    fn hard(entries: &[(&str, &str)]) -> ResourceList {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), q(v)))
            .collect()
    }

    fn default_hard() -> ResourceList {
        hard(&[
            ("requests.cpu", "4"),
            ("requests.memory", "15Gi"),
            ("limits.cpu", "8"),
            ("limits.memory", "32Gi"),
            ("pods", "20"),
        ])
    }

    fn project_namespace() -> ProjectNamespace {
        let mut ns = Namespace::new(&ObjectKey::cluster("proj-acme"));
        ns.metadata.uid = "ns-uid".into();
        ns.metadata
            .labels
            .insert("presslabs.com/project".into(), "acme".into());
        ProjectNamespace::new(ns, Arc::new(MetadataKeys::default()))
    }

    fn transform(existing: ResourceList) -> ResourceQuota {
        let ns = project_namespace();
        let defaults = QuotaDefaults::default();
        let syncer = ResourceQuotaSyncer::new(&ns, &defaults);
        let mut rq = ResourceQuota::new(&syncer.object_key());
        rq.spec.hard = existing;
        syncer.mutate(rq).unwrap()
    }

    #[test]
    fn uses_defaults_when_nothing_exists() {
        let rq = transform(ResourceList::new());
        assert_eq!(rq.spec.hard, default_hard());
        assert_eq!(rq.spec.hard["requests.memory"].as_str(), "15Gi");
    }

    #[test]
    fn keeps_bigger_overrides_and_restores_smaller_ones() {
        let rq = transform(hard(&[
            ("requests.cpu", "5"),
            ("requests.memory", "15Gi"),
            ("pods", "15"),
        ]));
        assert_eq!(
            rq.spec.hard,
            hard(&[
                ("requests.cpu", "5"),
                ("requests.memory", "15Gi"),
                ("limits.cpu", "8"),
                ("limits.memory", "32Gi"),
                ("pods", "20"),
            ])
        );
    }

    #[test]
    fn ties_resolve_to_the_default() {
        let rq = transform(hard(&[("requests.memory", "15360Mi"), ("limits.cpu", "8000m")]));
        assert_eq!(rq.spec.hard["requests.memory"].as_str(), "15Gi");
        assert_eq!(rq.spec.hard["limits.cpu"].as_str(), "8");
    }

    #[test]
    fn overrides_are_preserved_exactly() {
        let rq = transform(hard(&[("limits.memory", "65Gi"), ("pods", "21")]));
        assert_eq!(rq.spec.hard["limits.memory"].as_str(), "65Gi");
        assert_eq!(rq.spec.hard["pods"], q("21"));
    }

    #[test]
    fn unknown_resources_are_dropped() {
        let rq = transform(hard(&[("services", "100"), ("requests.storage", "1Ti")]));
        assert_eq!(rq.spec.hard.len(), 5);
        assert!(!rq.spec.hard.contains_key("services"));
        assert!(!rq.spec.hard.contains_key("requests.storage"));
    }

    #[test]
    fn never_below_the_floor() {
        let defaults = QuotaDefaults::default();
        let overrides = ["0", "1m", "3", "3999m", "4", "10Gi", "15Gi", "100", "1Ei", "-5"];
        for resource in QuotaResource::ALL {
            for value in overrides {
                let merged = defaults.merge(&hard(&[(resource.as_str(), value)]));
                let effective = &merged[resource.as_str()];
                assert!(effective >= defaults.get(resource), "{} = {}", resource, value);
                if q(value) > *defaults.get(resource) {
                    assert_eq!(effective.as_str(), value);
                }
            }
        }
    }

    #[test]
    fn transform_is_idempotent() {
        let ns = project_namespace();
        let defaults = QuotaDefaults::default();
        let syncer = ResourceQuotaSyncer::new(&ns, &defaults);

        let mut rq = ResourceQuota::new(&syncer.object_key());
        rq.metadata.labels.insert("team".into(), "blue".into());
        rq.spec.hard = hard(&[("pods", "50"), ("limits.cpu", "1"), ("services", "3")]);

        let once = syncer.mutate(rq).unwrap();
        let twice = syncer.mutate(once.clone()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.metadata.labels["team"], "blue");
        assert_eq!(once.metadata.labels["presslabs.com/project"], "acme");
    }

    #[test]
    fn configured_floor() {
        let overrides = BTreeMap::from([
            ("pods".to_string(), "40".to_string()),
            ("requests.cpu".to_string(), "6".to_string()),
        ]);
        let defaults = QuotaDefaults::with_overrides(&overrides).unwrap();
        assert_eq!(*defaults.get(QuotaResource::Pods), q("40"));
        assert_eq!(*defaults.get(QuotaResource::RequestsCpu), q("6"));
        assert_eq!(*defaults.get(QuotaResource::LimitsMemory), q("32Gi"));

        let unknown = BTreeMap::from([("services".to_string(), "1".to_string())]);
        assert!(QuotaDefaults::with_overrides(&unknown).is_err());
        let malformed = BTreeMap::from([("pods".to_string(), "many".to_string())]);
        assert!(QuotaDefaults::with_overrides(&malformed).is_err());
    }
}
