use pkg_types::labels::MetadataKeys;
use pkg_types::meta::OwnerReference;
use pkg_types::namespace::Namespace;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::component::{self, Component};

/// One reason a namespace cannot be treated as a project namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Violation {
    #[error("required label \"{0}\" is missing")]
    MissingLabel(String),
    #[error("label \"{label}\" should be \"{expected}\"")]
    WrongKind { label: String, expected: String },
    #[error("required annotation \"{0}\" is missing")]
    MissingAnnotation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("namespace {namespace} is not a valid project namespace: {}", join(.violations))]
pub struct ValidationError {
    pub namespace: String,
    pub violations: Vec<Violation>,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A namespace materializing a project.
#[derive(Debug, Clone)]
pub struct ProjectNamespace {
    namespace: Namespace,
    keys: Arc<MetadataKeys>,
}

impl ProjectNamespace {
    pub fn new(namespace: Namespace, keys: Arc<MetadataKeys>) -> Self {
        Self { namespace, keys }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn into_inner(self) -> Namespace {
        self.namespace
    }

    pub fn keys(&self) -> &MetadataKeys {
        &self.keys
    }

    /// Name of the namespace itself (`proj-<project>`).
    pub fn name(&self) -> &str {
        &self.namespace.metadata.name
    }

    /// Project name, read back from the project label.
    pub fn project_name(&self) -> &str {
        self.label(&self.keys.project).unwrap_or_default()
    }

    pub fn organization(&self) -> Option<&str> {
        self.label(&self.keys.organization)
            .filter(|org| !org.is_empty())
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.namespace.metadata.labels.get(key).map(String::as_str)
    }

    pub fn labels(&self) -> BTreeMap<String, String> {
        component::project_labels(&self.keys, self.project_name(), self.organization())
    }

    pub fn component_labels(&self, component: Component) -> BTreeMap<String, String> {
        component::component_labels(
            &self.keys,
            self.project_name(),
            self.organization(),
            component,
        )
    }

    pub fn component_name(&self, component: Component) -> String {
        component::component_name(&self.keys, self.project_name(), component)
    }

    pub fn owner_reference(&self) -> OwnerReference {
        self.namespace.controller_reference()
    }

    /// Every metadata problem, de-duplicated, in check order. Empty = valid.
    pub fn validate_metadata(&self) -> Vec<Violation> {
        let meta = &self.namespace.metadata;
        let mut violations = Vec::new();

        for label in self.keys.required_labels() {
            if meta.labels.get(label).is_none_or(|v| v.is_empty()) {
                violations.push(Violation::MissingLabel(label.to_string()));
            }
        }

        if self.label(&self.keys.kind) != Some(self.keys.kind_project.as_str()) {
            violations.push(Violation::WrongKind {
                label: self.keys.kind.clone(),
                expected: self.keys.kind_project.clone(),
            });
        }

        for annotation in self.keys.required_annotations() {
            if meta.annotations.get(annotation).is_none_or(|v| v.is_empty()) {
                violations.push(Violation::MissingAnnotation(annotation.to_string()));
            }
        }

        let mut seen = HashSet::new();
        violations.retain(|v| seen.insert(v.clone()));
        violations
    }

    pub fn ensure_valid(&self) -> Result<(), ValidationError> {
        let violations = self.validate_metadata();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                namespace: self.name().to_string(),
                violations,
            })
        }
    }
}
