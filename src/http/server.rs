//! Service shell: HTTP listener lifecycle for one service.
//!
//! # Responsibilities
//! - Build the Axum router: observability routes plus business routes
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS,
//!   request accounting)
//! - Bind the resolved port; a bind failure is fatal
//! - Serve until the shutdown coordinator fires
//!
//! # Design Decisions
//! - The route table is frozen before the listener accepts anything
//! - Serving runs on a spawned task; callers hold a `ShellHandle`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ListenerSettings, ServiceConfig};
use crate::http::handlers::{observability_routes, Endpoints, ShellState};
use crate::http::middleware::{allow_methods_header, cors_layer, request_accounting};
use crate::http::request::{request_id_of, MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::shutdown::{wait_for, Shutdown};

/// Error type for shell operations.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Failed to bind the listen address (e.g. port already in use).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The serving task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// HTTP shell for one service instance.
pub struct ServiceShell {
    config: Arc<ServiceConfig>,
    listener: ListenerSettings,
    endpoints: Endpoints,
    routes: Router,
}

impl ServiceShell {
    /// Create a shell serving the observability endpoints.
    pub fn new(config: ServiceConfig, listener: ListenerSettings, endpoints: Endpoints) -> Self {
        Self {
            config: Arc::new(config),
            listener,
            endpoints,
            routes: Router::new(),
        }
    }

    /// Add business routes. They get the same middleware as the
    /// observability routes.
    ///
    /// # Panics
    /// If `routes` overlaps `/`, `/health` or `/metrics`, when the router is built.
    pub fn merge(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Address `start` binds: settings host plus resolved port.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.listener.host, self.config.listen_port())
    }

    /// Build the complete router with all middleware layers.
    ///
    /// Requests still running after `request_timeout_secs` get `408`.
    pub fn router(&self) -> Router {
        let state = ShellState {
            config: self.config.clone(),
            endpoints: self.endpoints.clone(),
        };

        let span_config = self.config.clone();
        let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
            tracing::info_span!(
                "request",
                service = %span_config.service_name(),
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id_of(request)
            )
        });

        observability_routes(state)
            .merge(self.routes.clone())
            .layer(middleware::from_fn_with_state(
                self.config.clone(),
                request_accounting,
            ))
            .layer(allow_methods_header(&self.config))
            .layer(cors_layer(&self.config))
            .layer(RequestBodyLimitLayer::new(self.listener.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.listener.request_timeout_secs),
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(trace)
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Bind the resolved address and start serving.
    pub async fn start(self) -> Result<ShellHandle, ShellError> {
        let addr = self.bind_address();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ShellError::Bind { addr, source })?;

        self.start_with_listener(listener)
    }

    /// Start serving on an already bound listener.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start_with_listener(self, listener: TcpListener) -> Result<ShellHandle, ShellError> {
        let local_addr = listener.local_addr().map_err(ShellError::Serve)?;
        let app = self.router();
        let service = self.config.service_name().to_string();

        let shutdown = Shutdown::new();
        let signal = wait_for(shutdown.subscribe());

        tracing::info!(
            service = %service,
            address = %local_addr,
            cors_origin = %self.config.cors_origin(),
            "HTTP server starting"
        );

        let task = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(signal)
                .await
                .map_err(ShellError::Serve)?;

            tracing::info!(service = %service, "HTTP server stopped");
            Ok::<(), ShellError>(())
        });

        Ok(ShellHandle {
            local_addr,
            shutdown,
            task,
        })
    }
}

/// A running shell.
///
/// Dropping the handle (and every `Shutdown` clone taken from it) stops
/// the server gracefully.
pub struct ShellHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), ShellError>>,
}

impl ShellHandle {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and drain in-flight requests.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    /// A coordinator that shuts this shell down when triggered.
    pub fn shutdown_trigger(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Wait for the server to stop.
    pub async fn wait(self) -> Result<(), ShellError> {
        self.task.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolver::resolve_with;
    use crate::health::{Clock, HealthStatus};
    use crate::observability::StaticExposition;
    use axum::http::{header, Method};
    use axum::routing::post;
    use chrono::{DateTime, TimeZone, Utc};
    use tower::ServiceExt;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn shell(origin: Option<&'static str>) -> ServiceShell {
        let config = resolve_with("auth-service", 3001, move |key| {
            (key == "CORS_ORIGIN").then(|| origin.map(str::to_string)).flatten()
        });
        let endpoints = Endpoints::new(
            "Hello World!",
            Arc::new(StaticExposition::new("nestjs_example_metric", "auth-service")),
        )
        .with_clock(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )));
        ServiceShell::new(config, ListenerSettings::default(), endpoints)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_greeting() {
        let response = shell(None).router().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, "Hello World!");
    }

    #[tokio::test]
    async fn test_health() {
        let response = shell(None).router().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_text(response).await,
            r#"{"status":"ok","service":"auth-service","timestamp":"2024-01-01T00:00:00.000Z"}"#
        );
    }

    #[tokio::test]
    async fn test_metrics() {
        let response = shell(None).router().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            body_text(response).await,
            "nestjs_example_metric{service=\"auth-service\"} 1\n"
        );
    }

    #[tokio::test]
    async fn test_health_is_not_cached() {
        let endpoints = Endpoints::new(
            "Hello World!",
            Arc::new(StaticExposition::new("nestjs_example_metric", "api-gateway")),
        );
        let config = resolve_with("api-gateway", 4000, |_| None);
        let router = ServiceShell::new(config, ListenerSettings::default(), endpoints).router();

        let mut previous: Option<DateTime<chrono::FixedOffset>> = None;
        for _ in 0..3 {
            let response = router.clone().oneshot(get("/health")).await.unwrap();
            let status: HealthStatus = serde_json::from_str(&body_text(response).await).unwrap();
            let instant = DateTime::parse_from_rfc3339(&status.timestamp).unwrap();
            if let Some(previous) = previous {
                assert!(instant >= previous);
            }
            previous = Some(instant);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_cors_reflects_matching_origin() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = shell(None).router().oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, PATCH"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_foreign_origin() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://evil.example.com")
            .body(Body::empty())
            .unwrap();
        let response = shell(None).router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_wildcard_mirrors_origin() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://app.example.com")
            .body(Body::empty())
            .unwrap();
        let response = shell(Some("*")).router().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .body(Body::empty())
            .unwrap();
        let response = shell(None).router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("PATCH"));
    }

    #[tokio::test]
    async fn test_request_id_generated_and_propagated() {
        let response = shell(None).router().oneshot(get("/")).await.unwrap();
        let id = response.headers()[X_REQUEST_ID].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());

        let request = Request::builder()
            .uri("/")
            .header("x-request-id", "client-chosen")
            .body(Body::empty())
            .unwrap();
        let response = shell(None).router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "client-chosen");
    }

    #[tokio::test]
    async fn test_business_routes_share_middleware() {
        let business = Router::new().route("/login", post(|| async { "token" }));
        let router = shell(None).merge(business).router();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(body_text(response).await, "token");
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_408() {
        let slow = Router::new().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        );
        let config = resolve_with("auth-service", 3001, |_| None);
        let endpoints = Endpoints::new(
            "Hello World!",
            Arc::new(StaticExposition::new("nestjs_example_metric", "auth-service")),
        );
        let listener = ListenerSettings {
            request_timeout_secs: 1,
            ..ListenerSettings::default()
        };
        let router = ServiceShell::new(config, listener, endpoints)
            .merge(slow)
            .router();

        let response = router.oneshot(get("/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = shell(None).router().oneshot(get("/contracts")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bind_address() {
        let shell = shell(None);
        assert_eq!(shell.bind_address().port(), 3001);
        assert!(shell.bind_address().ip().is_unspecified());
    }
}
