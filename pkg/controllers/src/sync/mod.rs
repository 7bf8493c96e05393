//! Concrete syncers, one per child object kind.

pub mod limit_range;
pub mod namespace;
pub mod resource_quota;
pub mod service_monitor;

pub use limit_range::LimitRangeSyncer;
pub use namespace::NamespaceSyncer;
pub use resource_quota::{QuotaDefaults, ResourceQuotaSyncer};
pub use service_monitor::ServiceMonitorSyncer;
