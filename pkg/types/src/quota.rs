use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::object::{Object, Spec};
use crate::quantity::Quantity;

/// Resource quota for a namespace — caps aggregate requests, limits and pod count.
pub type ResourceQuota = Object<ResourceQuotaSpec>;

/// Resource name → hard cap. Keys are Kubernetes resource names
/// (`requests.cpu`, `pods`, …); unrecognised keys are allowed here.
pub type ResourceList = BTreeMap<String, Quantity>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuotaSpec {
    #[serde(default)]
    pub hard: ResourceList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuotaStatus {
    #[serde(default)]
    pub hard: ResourceList,
    #[serde(default)]
    pub used: ResourceList,
}

impl Spec for ResourceQuotaSpec {
    type Status = ResourceQuotaStatus;
    const API_VERSION: &'static str = "v1";
    const KIND: &'static str = "ResourceQuota";
    const PLURAL: &'static str = "resourcequotas";
    const NAMESPACED: bool = true;
}

/// The resource kinds every project quota is reconciled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuotaResource {
    RequestsCpu,
    RequestsMemory,
    LimitsCpu,
    LimitsMemory,
    Pods,
}

impl QuotaResource {
    pub const ALL: [QuotaResource; 5] = [
        QuotaResource::RequestsCpu,
        QuotaResource::RequestsMemory,
        QuotaResource::LimitsCpu,
        QuotaResource::LimitsMemory,
        QuotaResource::Pods,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuotaResource::RequestsCpu => "requests.cpu",
            QuotaResource::RequestsMemory => "requests.memory",
            QuotaResource::LimitsCpu => "limits.cpu",
            QuotaResource::LimitsMemory => "limits.memory",
            QuotaResource::Pods => "pods",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_names() {
        assert_eq!(QuotaResource::from_name("pods"), Some(QuotaResource::Pods));
        assert_eq!(
            QuotaResource::from_name("limits.memory"),
            Some(QuotaResource::LimitsMemory)
        );
        assert_eq!(QuotaResource::from_name("services"), None);
    }

    #[test]
    fn status_is_optional_in_json() {
        let rq: ResourceQuota = serde_json::from_str(
            r#"{"metadata":{"name":"q","namespace":"proj-a"},"spec":{"hard":{"pods":"20"}}}"#,
        )
        .unwrap();
        assert_eq!(rq.spec.hard["pods"], Quantity::from_units(20));
        assert!(rq.status.used.is_empty());
    }
}
