use pkg_types::labels::MetadataKeys;
use pkg_types::meta::OwnerReference;
use pkg_types::project::Project;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::component::{self, Component};

/// A [`Project`] together with the metadata keys used to derive its
/// children's names and labels.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project: Project,
    keys: Arc<MetadataKeys>,
}

impl ProjectContext {
    pub fn new(project: Project, keys: Arc<MetadataKeys>) -> Self {
        Self { project, keys }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_inner(self) -> Project {
        self.project
    }

    pub fn keys(&self) -> &MetadataKeys {
        &self.keys
    }

    pub fn name(&self) -> &str {
        &self.project.metadata.name
    }

    pub fn organization(&self) -> Option<&str> {
        self.project
            .metadata
            .labels
            .get(&self.keys.organization)
            .map(String::as_str)
            .filter(|org| !org.is_empty())
    }

    pub fn created_by(&self) -> Option<&str> {
        self.project
            .metadata
            .annotations
            .get(&self.keys.created_by)
            .map(String::as_str)
            .filter(|user| !user.is_empty())
    }

    /// The display name, falling back to the project name when unset.
    pub fn display_name(&self) -> &str {
        if self.project.spec.display_name.is_empty() {
            self.name()
        } else {
            &self.project.spec.display_name
        }
    }

    pub fn labels(&self) -> BTreeMap<String, String> {
        component::project_labels(&self.keys, self.name(), self.organization())
    }

    pub fn component_labels(&self, component: Component) -> BTreeMap<String, String> {
        component::component_labels(&self.keys, self.name(), self.organization(), component)
    }

    pub fn component_name(&self, component: Component) -> String {
        component::component_name(&self.keys, self.name(), component)
    }

    pub fn namespace_name(&self) -> String {
        self.component_name(Component::Namespace)
    }

    pub fn owner_reference(&self) -> OwnerReference {
        self.project.controller_reference()
    }
}
