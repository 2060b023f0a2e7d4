//! Service instances.
//!
//! Every service in the repository is the same shell with a different
//! name, default port and greeting; the differences live in `catalog.rs`.

pub mod catalog;
pub mod instance;

pub use catalog::{ServiceSpec, CATALOG};
pub use instance::ServiceInstance;
