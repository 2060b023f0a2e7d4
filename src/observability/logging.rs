//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Pick pretty or JSON output from settings
//! - Apply the configured level unless `RUST_LOG` is set

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilitySettings};

/// Install the global subscriber.
///
/// Fails instead of panicking when a subscriber is already set.
pub fn init_logging(settings: &ObservabilitySettings) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&settings.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init(),
    }
}

/// Filter used when `RUST_LOG` is absent.
pub fn default_directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("service_shell={level},tower_http={level}")
}
