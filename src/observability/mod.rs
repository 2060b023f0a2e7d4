//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → GET /metrics (text exposition, Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metric calls are no-ops until a recorder is installed
//! - `/metrics` output sits behind a trait so the static line can be
//!   swapped for a registry without touching the endpoint

pub mod logging;
pub mod metrics;

pub use self::logging::init_logging;
pub use self::metrics::{build_exposition, MetricsExposition, RegistryExposition, StaticExposition};
