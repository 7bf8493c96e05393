use pkg_constants::labels as keys;

/// The label/annotation keys and naming conventions every reconciler uses.
///
/// One instance is built at startup and shared (behind an `Arc`) with every
/// component instead of reading package-level constants directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataKeys {
    pub project: String,
    pub organization: String,
    pub kind: String,
    pub kind_project: String,
    pub created_by: String,
    pub display_name: String,
    pub app_name: String,
    pub app_component: String,
    pub namespace_prefix: String,
}

impl Default for MetadataKeys {
    fn default() -> Self {
        Self {
            project: keys::PROJECT_LABEL.to_string(),
            organization: keys::ORGANIZATION_LABEL.to_string(),
            kind: keys::KIND_LABEL.to_string(),
            kind_project: keys::KIND_PROJECT.to_string(),
            created_by: keys::CREATED_BY_ANNOTATION.to_string(),
            display_name: keys::DISPLAY_NAME_ANNOTATION.to_string(),
            app_name: keys::APP_NAME_LABEL.to_string(),
            app_component: keys::APP_COMPONENT_LABEL.to_string(),
            namespace_prefix: keys::NAMESPACE_PREFIX.to_string(),
        }
    }
}

impl MetadataKeys {
    /// Labels a project namespace must carry with a non-empty value.
    pub fn required_labels(&self) -> [&str; 3] {
        [&self.organization, &self.project, &self.kind]
    }

    /// Annotations a project namespace must carry with a non-empty value.
    pub fn required_annotations(&self) -> [&str; 1] {
        [&self.created_by]
    }

    /// Name of the namespace materializing `project`.
    pub fn namespace_name(&self, project: &str) -> String {
        format!("{}{}", self.namespace_prefix, project)
    }
}
