use serde::{Deserialize, Serialize};

use crate::object::{Object, Spec};

pub type Namespace = Object<NamespaceSpec>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSpec {
    #[serde(default)]
    pub finalizers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

impl Spec for NamespaceSpec {
    type Status = NamespaceStatus;
    const API_VERSION: &'static str = "v1";
    const KIND: &'static str = "Namespace";
    const PLURAL: &'static str = "namespaces";
    const NAMESPACED: bool = false;
}
