//! Liveness reporting.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → clock.rs (current instant, injectable)
//!     → status.rs (HealthStatus { status, service, timestamp })
//!     → JSON response
//! ```
//!
//! # Design Decisions
//! - Status is recomputed on every request, never cached
//! - The clock is a trait so tests can pin the timestamp

pub mod clock;
pub mod status;

pub use clock::{Clock, SystemClock};
pub use status::{format_timestamp, HealthState, HealthStatus};
