//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Render the `/metrics` body for a service
//! - Record per-request counters and latency histograms
//!
//! # Metrics
//! - `<metric_name>{service}` (static line): always `1`, one per service
//! - `http_requests_total` (counter): requests by service, method, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - The body is line-oriented text exposition ending in `\n`
//! - The static line is emitted in every mode, so scrapers keyed on it
//!   keep working when the registry is enabled

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::Method;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsMode;

/// How often registry histograms are drained when nothing scrapes.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Source of the `/metrics` response body.
pub trait MetricsExposition: Send + Sync + 'static {
    /// Render the full exposition. Always ends with `\n`.
    fn render(&self) -> String;
}

/// The fixed `<metric_name>{service="<name>"} 1` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticExposition {
    line: String,
}

impl StaticExposition {
    pub fn new(metric_name: &str, service: &str) -> Self {
        Self {
            line: format!(
                "{metric_name}{{service=\"{}\"}} 1\n",
                escape_label_value(service)
            ),
        }
    }
}

impl MetricsExposition for StaticExposition {
    fn render(&self) -> String {
        self.line.clone()
    }
}

/// The static line followed by everything recorded in a Prometheus registry.
pub struct RegistryExposition {
    baseline: StaticExposition,
    handle: PrometheusHandle,
}

impl RegistryExposition {
    /// Build a Prometheus recorder and install it as the global recorder.
    ///
    /// Only one recorder can be global per process. If one is already
    /// installed, the returned exposition renders this (empty) registry and
    /// a warning is logged. Upkeep runs every [`UPKEEP_INTERVAL`] on the
    /// current Tokio runtime.
    pub fn install(metric_name: &str, service: &str) -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        match tokio::runtime::Handle::try_current() {
            Ok(_) => {
                spawn_upkeep(handle.clone(), UPKEEP_INTERVAL);
            }
            Err(_) => tracing::warn!(
                service = %service,
                "No Tokio runtime; registry histograms are only drained on scrape"
            ),
        }

        if metrics::set_global_recorder(recorder).is_err() {
            tracing::warn!(
                service = %service,
                "Global metrics recorder already installed; registry output will stay empty"
            );
        }

        Self::with_handle(metric_name, service, handle)
    }

    /// Render from an existing registry handle.
    pub fn with_handle(metric_name: &str, service: &str, handle: PrometheusHandle) -> Self {
        Self {
            baseline: StaticExposition::new(metric_name, service),
            handle,
        }
    }
}

impl MetricsExposition for RegistryExposition {
    fn render(&self) -> String {
        let mut body = self.baseline.render();
        let registry = self.handle.render();
        if !registry.is_empty() {
            body.push_str(&registry);
            if !body.ends_with('\n') {
                body.push('\n');
            }
        }
        body
    }
}

/// Drain registry histograms every `period` so samples never pile up
/// between scrapes. Must be called inside a Tokio runtime.
pub fn spawn_upkeep(handle: PrometheusHandle, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Pick the exposition for the configured mode.
pub fn build_exposition(
    mode: MetricsMode,
    metric_name: &str,
    service: &str,
) -> Arc<dyn MetricsExposition> {
    match mode {
        MetricsMode::Static => Arc::new(StaticExposition::new(metric_name, service)),
        MetricsMode::Registry => Arc::new(RegistryExposition::install(metric_name, service)),
    }
}

/// Record one finished request.
pub fn record_request(service: &str, method: &Method, status: u16, start: Instant) {
    let latency = start.elapsed().as_secs_f64();

    metrics::counter!(
        "http_requests_total",
        "service" => service.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "service" => service.to_string(),
        "method" => method.to_string()
    )
    .record(latency);
}

/// Escape a label value for the text exposition format.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
