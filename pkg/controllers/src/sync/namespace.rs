use anyhow::Context;
use pkg_types::meta::{ObjectKey, OwnerReference, merge_labels};
use pkg_types::namespace::{Namespace, NamespaceSpec};
use pkg_types::validate::validate_dns_label;

use crate::project::ProjectContext;
use crate::syncer::ObjectSyncer;

/// Materializes a project as its `proj-<name>` namespace.
pub struct NamespaceSyncer<'a> {
    project: &'a ProjectContext,
}

impl<'a> NamespaceSyncer<'a> {
    pub fn new(project: &'a ProjectContext) -> Self {
        Self { project }
    }
}

impl ObjectSyncer for NamespaceSyncer<'_> {
    type Spec = NamespaceSpec;

    fn object_key(&self) -> ObjectKey {
        ObjectKey::cluster(self.project.namespace_name())
    }

    fn owner(&self) -> OwnerReference {
        self.project.owner_reference()
    }

    fn mutate(&self, mut ns: Namespace) -> anyhow::Result<Namespace> {
        let keys = self.project.keys();
        validate_dns_label(self.project.name())
            .with_context(|| format!("project '{}' has an unusable name", self.project.name()))?;
        let namespace = self.project.namespace_name();
        validate_dns_label(&namespace).with_context(|| {
            format!(
                "project '{}' has an unusable name: namespace '{}'",
                self.project.name(),
                namespace
            )
        })?;

        let mut labels = self.project.labels();
        labels.insert(keys.kind.clone(), keys.kind_project.clone());
        ns.metadata.labels = merge_labels(&ns.metadata.labels, &labels);

        if let Some(creator) = self.project.created_by() {
            ns.metadata
                .annotations
                .insert(keys.created_by.clone(), creator.to_string());
        }
        ns.metadata.annotations.insert(
            keys.display_name.clone(),
            self.project.display_name().to_string(),
        );
        Ok(ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectns::ProjectNamespace;
    use pkg_types::labels::MetadataKeys;
    use pkg_types::project::Project;
    use std::sync::Arc;

    fn context(name: &str) -> ProjectContext {
        let mut project = Project::new(&ObjectKey::cluster(name));
        project.metadata.uid = "project-uid".into();
        project
            .metadata
            .labels
            .insert("presslabs.com/organization".into(), "initech".into());
        project
            .metadata
            .annotations
            .insert("presslabs.com/created-by".into(), "jane".into());
        ProjectContext::new(project, Arc::new(MetadataKeys::default()))
    }

    #[test]
    fn produces_a_valid_project_namespace() {
        let project = context("acme");
        let syncer = NamespaceSyncer::new(&project);
        assert_eq!(syncer.object_key(), ObjectKey::cluster("proj-acme"));

        let ns = syncer.mutate(Namespace::new(&syncer.object_key())).unwrap();
        assert_eq!(ns.metadata.labels["presslabs.com/project"], "acme");
        assert_eq!(ns.metadata.labels["presslabs.com/organization"], "initech");
        assert_eq!(ns.metadata.labels["presslabs.com/kind"], "project");
        assert_eq!(ns.metadata.annotations["presslabs.com/created-by"], "jane");
        assert_eq!(ns.metadata.annotations["presslabs.com/display-name"], "acme");

        let wrapped = ProjectNamespace::new(ns, Arc::new(MetadataKeys::default()));
        assert!(wrapped.validate_metadata().is_empty());
    }

    #[test]
    fn display_name_follows_the_project() {
        let mut project = context("acme");
        let mut inner = project.clone().into_inner();
        inner.spec.display_name = "ACME Corp".into();
        project = ProjectContext::new(inner, Arc::new(MetadataKeys::default()));

        let syncer = NamespaceSyncer::new(&project);
        let ns = syncer.mutate(Namespace::new(&syncer.object_key())).unwrap();
        assert_eq!(ns.metadata.annotations["presslabs.com/display-name"], "ACME Corp");
    }

    #[test]
    fn keeps_foreign_labels_and_is_idempotent() {
        let project = context("acme");
        let syncer = NamespaceSyncer::new(&project);
        let mut ns = Namespace::new(&syncer.object_key());
        ns.metadata.labels.insert("istio-injection".into(), "enabled".into());

        let once = syncer.mutate(ns).unwrap();
        let twice = syncer.mutate(once.clone()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.metadata.labels["istio-injection"], "enabled");
    }

    #[test]
    fn unusable_project_name_is_a_mutation_error() {
        let project = context("Not_A_Label");
        let syncer = NamespaceSyncer::new(&project);
        let err = syncer
            .mutate(Namespace::new(&syncer.object_key()))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unusable name"));
    }

    #[test]
    fn namespace_name_must_fit_a_dns_label() {
        let longest = "a".repeat(58);
        let project = context(&longest);
        let syncer = NamespaceSyncer::new(&project);
        let ns = syncer.mutate(Namespace::new(&syncer.object_key())).unwrap();
        assert_eq!(ns.metadata.name.len(), 63);

        let project = context(&"a".repeat(59));
        let syncer = NamespaceSyncer::new(&project);
        let err = syncer
            .mutate(Namespace::new(&syncer.object_key()))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds 63 characters"));
    }
}
