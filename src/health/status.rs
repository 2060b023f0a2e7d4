//! Health response body.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::health::clock::Clock;

/// Liveness state. A process that can answer is `ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub service: String,
    /// RFC 3339 UTC instant with millisecond precision.
    pub timestamp: String,
}

impl HealthStatus {
    /// Observe the service now.
    pub fn observe(service: &str, clock: &dyn Clock) -> Self {
        Self {
            status: HealthState::Ok,
            service: service.to_string(),
            timestamp: format_timestamp(clock.now()),
        }
    }
}

/// Format as `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
