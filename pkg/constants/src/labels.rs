//! Label and annotation keys shared by every reconciled object.
//!
//! These values are a persisted convention: objects written by older
//! controller versions are matched by them, so they must never change.

// ─── Project labels ───────────────────────────────────────────────────────

/// Label carrying the owning project's name.
pub const PROJECT_LABEL: &str = "presslabs.com/project";

/// Label carrying the owning organization's name.
pub const ORGANIZATION_LABEL: &str = "presslabs.com/organization";

/// Label marking what a namespace materializes.
pub const KIND_LABEL: &str = "presslabs.com/kind";

/// Expected value of [`KIND_LABEL`] on project namespaces.
pub const KIND_PROJECT: &str = "project";

// ─── Project annotations ──────────────────────────────────────────────────

/// Annotation naming the user who created the project.
pub const CREATED_BY_ANNOTATION: &str = "presslabs.com/created-by";

/// Annotation carrying the human-readable project name.
pub const DISPLAY_NAME_ANNOTATION: &str = "presslabs.com/display-name";

// ─── Kubernetes standard labels ───────────────────────────────────────────

/// Name of the application a component belongs to (e.g. "gitea").
pub const APP_NAME_LABEL: &str = "app.kubernetes.io/name";

/// Role of the component inside its application (e.g. "web").
pub const APP_COMPONENT_LABEL: &str = "app.kubernetes.io/component";

// ─── Naming ───────────────────────────────────────────────────────────────

/// Prefix of every project namespace: `proj-<project-name>`.
pub const NAMESPACE_PREFIX: &str = "proj-";

/// Object name shared by the per-project quota and limit range.
pub const DASHBOARD_OBJECT_NAME: &str = "presslabs-dashboard";
