//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! environment (<SERVICE>_PORT, CORS_ORIGIN)
//!     → resolver.rs (defaults on absent/invalid values)
//!     → ServiceConfig (immutable, shared via Arc)
//!
//! optional settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ShellSettings
//! ```
//!
//! # Design Decisions
//! - Both values are resolved once at startup, before the listener binds
//! - Environment resolution never fails; a bad settings file is fatal
//! - All settings fields have defaults to allow minimal files

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_or_default, load_settings, ConfigError};
pub use resolver::{resolve, resolve_with, ServiceConfig};
pub use schema::{ListenerSettings, LogFormat, MetricsMode, ObservabilitySettings, ShellSettings};
