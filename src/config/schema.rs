//! Shell settings schema.
//!
//! Ambient knobs shared by every service: listener host, request limits
//! and observability. All types derive Serde traits for deserialization
//! from an optional TOML file; every field has a default.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Root settings for a service shell.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ShellSettings {
    /// Listener settings (host, timeouts, body limit).
    pub listener: ListenerSettings,

    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
}

/// Listener settings. The port is never read from here; it comes from the
/// per-service environment variable.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerSettings {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: IpAddr,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// What `/metrics` serves.
    pub metrics_mode: MetricsMode,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_mode: MetricsMode::Static,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricsMode {
    /// Single fixed line per service.
    #[default]
    Static,
    /// Fixed line followed by the Prometheus registry render.
    Registry,
}
