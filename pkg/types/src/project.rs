use serde::{Deserialize, Serialize};

use crate::object::{Object, Spec};

/// A tenant. Its name seeds the namespace and every child object's identity;
/// the owning organization travels as a label, the creator as an annotation.
pub type Project = Object<ProjectSpec>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    #[serde(default)]
    pub display_name: String,
}

impl Spec for ProjectSpec {
    type Status = ();
    const API_VERSION: &'static str = "dashboard.presslabs.com/v1alpha1";
    const KIND: &'static str = "Project";
    const PLURAL: &'static str = "projects";
    const NAMESPACED: bool = false;
}
