use pkg_types::labels::MetadataKeys;
use std::collections::BTreeMap;

/// How a component's object name is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectName {
    /// The same fixed name in every project.
    Literal(&'static str),
    /// `<namespace prefix><project name>`, i.e. `proj-<project>`.
    ProjectNamespace,
}

/// Static identity of one child object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentIdentity {
    /// Role inside the application (eg. web, database, cache). May be empty.
    pub name: &'static str,
    /// Application (eg. gitea, prometheus). May be empty.
    pub app: &'static str,
    pub object_name: ObjectName,
}

/// Every child object type a project owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Namespace,
    LimitRange,
    ResourceQuota,
    PrometheusServiceAccount,
    PrometheusRoleBinding,
    Prometheus,
    GiteaDeployment,
    GiteaService,
    GiteaIngress,
    GiteaPvc,
    GiteaSecret,
    OwnerRoleBinding,
    MemberRoleBinding,
    WordpressServiceMonitor,
    MysqlServiceMonitor,
    MemcachedServiceMonitor,
}

const DASHBOARD: ObjectName = ObjectName::Literal(pkg_constants::labels::DASHBOARD_OBJECT_NAME);

impl Component {
    pub const ALL: [Component; 16] = [
        Component::Namespace,
        Component::LimitRange,
        Component::ResourceQuota,
        Component::PrometheusServiceAccount,
        Component::PrometheusRoleBinding,
        Component::Prometheus,
        Component::GiteaDeployment,
        Component::GiteaService,
        Component::GiteaIngress,
        Component::GiteaPvc,
        Component::GiteaSecret,
        Component::OwnerRoleBinding,
        Component::MemberRoleBinding,
        Component::WordpressServiceMonitor,
        Component::MysqlServiceMonitor,
        Component::MemcachedServiceMonitor,
    ];

    /// Components scraped through a per-project ServiceMonitor.
    pub const MONITORED: [Component; 3] = [
        Component::WordpressServiceMonitor,
        Component::MysqlServiceMonitor,
        Component::MemcachedServiceMonitor,
    ];

    pub const fn identity(self) -> ComponentIdentity {
        let (name, app, object_name) = match self {
            Component::Namespace => ("", "", ObjectName::ProjectNamespace),
            Component::LimitRange => ("", "", DASHBOARD),
            Component::ResourceQuota => ("", "", DASHBOARD),
            Component::PrometheusServiceAccount
            | Component::PrometheusRoleBinding
            | Component::Prometheus => ("", "prometheus", ObjectName::Literal("prometheus")),
            Component::GiteaDeployment
            | Component::GiteaService
            | Component::GiteaIngress
            | Component::GiteaPvc => ("web", "gitea", ObjectName::Literal("gitea")),
            Component::GiteaSecret => ("web", "gitea", ObjectName::Literal("gitea-conf")),
            Component::OwnerRoleBinding => ("", "", ObjectName::Literal("owner")),
            Component::MemberRoleBinding => ("", "", ObjectName::Literal("member")),
            Component::WordpressServiceMonitor => {
                ("", "prometheus", ObjectName::Literal("wordpress"))
            }
            Component::MysqlServiceMonitor => ("", "prometheus", ObjectName::Literal("mysql")),
            Component::MemcachedServiceMonitor => {
                ("", "prometheus", ObjectName::Literal("memcached"))
            }
        };
        ComponentIdentity {
            name,
            app,
            object_name,
        }
    }
}

/// Labels every object of `project` carries.
pub fn project_labels(
    keys: &MetadataKeys,
    project: &str,
    organization: Option<&str>,
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::from([(keys.project.clone(), project.to_string())]);
    if let Some(org) = organization {
        labels.insert(keys.organization.clone(), org.to_string());
    }
    labels
}

/// Project labels plus the component's application and role, when declared.
pub fn component_labels(
    keys: &MetadataKeys,
    project: &str,
    organization: Option<&str>,
    component: Component,
) -> BTreeMap<String, String> {
    let identity = component.identity();
    let mut labels = project_labels(keys, project, organization);
    if !identity.app.is_empty() {
        labels.insert(keys.app_name.clone(), identity.app.to_string());
    }
    if !identity.name.is_empty() {
        labels.insert(keys.app_component.clone(), identity.name.to_string());
    }
    labels
}

/// Object name of `component` inside `project`.
pub fn component_name(keys: &MetadataKeys, project: &str, component: Component) -> String {
    match component.identity().object_name {
        ObjectName::Literal(name) => name.to_string(),
        ObjectName::ProjectNamespace => keys.namespace_name(project),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names() {
        let keys = MetadataKeys::default();
        assert_eq!(component_name(&keys, "acme", Component::Namespace), "proj-acme");
        assert_eq!(
            component_name(&keys, "acme", Component::ResourceQuota),
            "presslabs-dashboard"
        );
        assert_eq!(component_name(&keys, "acme", Component::GiteaSecret), "gitea-conf");
        assert_eq!(
            component_name(&keys, "acme", Component::MysqlServiceMonitor),
            "mysql"
        );
    }

    #[test]
    fn labels_include_organization_only_when_set() {
        let keys = MetadataKeys::default();
        let without = project_labels(&keys, "acme", None);
        assert_eq!(without.len(), 1);
        assert_eq!(without["presslabs.com/project"], "acme");

        let with = project_labels(&keys, "acme", Some("initech"));
        assert_eq!(with["presslabs.com/organization"], "initech");
    }

    #[test]
    fn component_labels_skip_empty_fields() {
        let keys = MetadataKeys::default();

        let quota = component_labels(&keys, "acme", None, Component::ResourceQuota);
        assert!(!quota.contains_key("app.kubernetes.io/name"));
        assert!(!quota.contains_key("app.kubernetes.io/component"));

        let monitor = component_labels(&keys, "acme", None, Component::MysqlServiceMonitor);
        assert_eq!(monitor["app.kubernetes.io/name"], "prometheus");
        assert!(!monitor.contains_key("app.kubernetes.io/component"));

        let gitea = component_labels(&keys, "acme", Some("initech"), Component::GiteaDeployment);
        assert_eq!(gitea["app.kubernetes.io/name"], "gitea");
        assert_eq!(gitea["app.kubernetes.io/component"], "web");
        assert_eq!(gitea["presslabs.com/organization"], "initech");
        assert_eq!(gitea.len(), 4);
    }

    #[test]
    fn every_component_has_a_name() {
        let keys = MetadataKeys::default();
        for component in Component::ALL {
            assert!(!component_name(&keys, "acme", component).is_empty());
        }
    }
}
