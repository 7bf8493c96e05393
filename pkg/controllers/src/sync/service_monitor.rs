use pkg_types::meta::{ObjectKey, OwnerReference, merge_labels};
use pkg_types::service_monitor::{Endpoint, ServiceMonitor, ServiceMonitorSpec};

use crate::component::Component;
use crate::projectns::ProjectNamespace;
use crate::syncer::ObjectSyncer;

/// Service port every bundled application exposes metrics on.
const METRICS_PORT: &str = "prometheus";

/// Reconciles the ServiceMonitor scraping one bundled application.
pub struct ServiceMonitorSyncer<'a> {
    namespace: &'a ProjectNamespace,
    component: Component,
}

impl<'a> ServiceMonitorSyncer<'a> {
    pub fn new(namespace: &'a ProjectNamespace, component: Component) -> Self {
        Self {
            namespace,
            component,
        }
    }
}

impl ObjectSyncer for ServiceMonitorSyncer<'_> {
    type Spec = ServiceMonitorSpec;

    fn object_key(&self) -> ObjectKey {
        ObjectKey::namespaced(
            self.namespace.name(),
            self.namespace.component_name(self.component),
        )
    }

    fn owner(&self) -> OwnerReference {
        self.namespace.owner_reference()
    }

    fn mutate(&self, mut sm: ServiceMonitor) -> anyhow::Result<ServiceMonitor> {
        let labels = self.namespace.component_labels(self.component);
        sm.metadata.labels = merge_labels(&sm.metadata.labels, &labels);
        sm.spec.endpoints = vec![Endpoint {
            port: METRICS_PORT.to_string(),
            ..Default::default()
        }];
        sm.spec.selector.match_labels = labels;
        Ok(sm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::labels::MetadataKeys;
    use pkg_types::namespace::Namespace;
    use std::sync::Arc;

    #[test]
    fn one_monitor_per_component() {
        let mut ns = Namespace::new(&ObjectKey::cluster("proj-acme"));
        ns.metadata
            .labels
            .insert("presslabs.com/project".into(), "acme".into());
        let ns = ProjectNamespace::new(ns, Arc::new(MetadataKeys::default()));

        let names: Vec<String> = Component::MONITORED
            .into_iter()
            .map(|c| ServiceMonitorSyncer::new(&ns, c).object_key().name)
            .collect();
        assert_eq!(names, vec!["wordpress", "mysql", "memcached"]);

        let syncer = ServiceMonitorSyncer::new(&ns, Component::MysqlServiceMonitor);
        let sm = syncer.mutate(ServiceMonitor::new(&syncer.object_key())).unwrap();
        assert_eq!(sm.spec.endpoints.len(), 1);
        assert_eq!(sm.spec.endpoints[0].port, "prometheus");
        assert_eq!(sm.spec.selector.match_labels["presslabs.com/project"], "acme");
        assert_eq!(
            sm.spec.selector.match_labels["app.kubernetes.io/name"],
            "prometheus"
        );
        assert_eq!(syncer.mutate(sm.clone()).unwrap(), sm);
    }
}
