//! Service shell library.
//!
//! Shared bootstrap for every HTTP service in the repository: environment
//! driven config, a CORS-enabled listener, and the `/`, `/health` and
//! `/metrics` endpoints.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod service;

pub use config::{ServiceConfig, ShellSettings};
pub use http::{ServiceShell, ShellHandle};
pub use lifecycle::Shutdown;
pub use service::{ServiceInstance, ServiceSpec};
