//! Object model shared by the store, the syncers and the controller.

pub mod config;
pub mod labels;
pub mod limit_range;
pub mod meta;
pub mod namespace;
pub mod object;
pub mod project;
pub mod quantity;
pub mod quota;
pub mod service_monitor;
pub mod validate;
