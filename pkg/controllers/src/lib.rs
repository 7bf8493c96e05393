//! Project reconciliation: the generic object syncer, the concrete syncers
//! built on it, and the controller loop that drives them.

pub mod component;
pub mod controller;
pub mod project;
pub mod projectns;
pub mod sync;
pub mod syncer;
