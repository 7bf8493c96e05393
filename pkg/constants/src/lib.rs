//! Centralized constants for the project controller.
//!
//! All project-wide constant values live here.
//! Change a value in one place and it applies everywhere.

pub mod labels;
pub mod limits;
pub mod paths;
pub mod quota;
pub mod state;
