//! Object storage: the [`store::ObjectStore`] seam, its in-memory and
//! SlateDB implementations, and the typed [`client::Client`] on top.

pub mod client;
pub mod memory;
pub mod slate;
pub mod store;
