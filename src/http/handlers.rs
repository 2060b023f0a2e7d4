//! Observability endpoints shared by every service.
//!
//! | Route      | Response                                              |
//! |------------|-------------------------------------------------------|
//! | `/`        | greeting, `text/plain`                                |
//! | `/health`  | `{"status":"ok","service":..,"timestamp":..}`         |
//! | `/metrics` | text exposition, `text/plain`, ends with `\n`         |
//!
//! A service may also serve the exposition on one alias path.
//!
//! All three are pure reads of shell state and the clock.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::config::ServiceConfig;
use crate::health::{Clock, HealthStatus, SystemClock};
use crate::observability::MetricsExposition;

pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// What the observability endpoints serve, apart from the service name.
#[derive(Clone)]
pub struct Endpoints {
    greeting: Arc<str>,
    exposition: Arc<dyn MetricsExposition>,
    clock: Arc<dyn Clock>,
    metrics_alias: Option<&'static str>,
}

impl Endpoints {
    pub fn new(greeting: impl Into<Arc<str>>, exposition: Arc<dyn MetricsExposition>) -> Self {
        Self {
            greeting: greeting.into(),
            exposition,
            clock: Arc::new(SystemClock),
            metrics_alias: None,
        }
    }

    /// Replace the health clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Also serve the exposition at `path`.
    pub fn with_metrics_alias(mut self, path: &'static str) -> Self {
        self.metrics_alias = Some(path);
        self
    }
}

/// State injected into the observability handlers.
#[derive(Clone)]
pub struct ShellState {
    pub config: Arc<ServiceConfig>,
    pub endpoints: Endpoints,
}

/// The fixed routes, with state applied.
pub fn observability_routes(state: ShellState) -> Router {
    let mut router = Router::new()
        .route("/", get(greeting))
        .route("/health", get(health))
        .route("/metrics", get(metrics_text));

    if let Some(alias) = state.endpoints.metrics_alias {
        router = router.route(alias, get(metrics_text));
    }

    router.with_state(state)
}

async fn greeting(State(state): State<ShellState>) -> String {
    state.endpoints.greeting.to_string()
}

async fn health(State(state): State<ShellState>) -> Json<HealthStatus> {
    Json(HealthStatus::observe(
        state.config.service_name(),
        state.endpoints.clock.as_ref(),
    ))
}

async fn metrics_text(State(state): State<ShellState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.endpoints.exposition.render(),
    )
}
