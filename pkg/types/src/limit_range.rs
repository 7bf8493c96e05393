use serde::{Deserialize, Serialize};

use crate::object::{Object, Spec};
use crate::quota::ResourceList;

/// Per-container defaults and bounds inside a namespace.
pub type LimitRange = Object<LimitRangeSpec>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitRangeSpec {
    #[serde(default)]
    pub limits: Vec<LimitRangeItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitType {
    #[default]
    Container,
    Pod,
    PersistentVolumeClaim,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitRangeItem {
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    /// Limit applied to containers that declare none.
    #[serde(default)]
    pub default: ResourceList,
    /// Request applied to containers that declare none.
    #[serde(default)]
    pub default_request: ResourceList,
    #[serde(default)]
    pub max: ResourceList,
    #[serde(default)]
    pub min: ResourceList,
}

impl Spec for LimitRangeSpec {
    type Status = ();
    const API_VERSION: &'static str = "v1";
    const KIND: &'static str = "LimitRange";
    const PLURAL: &'static str = "limitranges";
    const NAMESPACED: bool = true;
}
