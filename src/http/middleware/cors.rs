//! CORS policy.
//!
//! # Responsibilities
//! - Reflect `Origin` only when it equals the configured origin
//! - Advertise the fixed method list and allow credentials
//! - Answer preflight requests before they reach a handler
//!
//! # Design Decisions
//! - `*` mirrors the request origin: a literal `*` is not allowed
//!   together with credentials
//! - `Access-Control-Allow-Methods` is set on every response, not only
//!   on preflights

use axum::http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::ServiceConfig;

/// Fallback for the methods header; matches the resolver's fixed set.
const DEFAULT_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH";

/// Whether `origin` may see responses under `allowed`.
pub fn origin_allowed(allowed: &str, origin: &HeaderValue) -> bool {
    allowed == "*" || origin.as_bytes() == allowed.as_bytes()
}

/// Build the CORS layer for a service.
pub fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    let allowed = config.cors_origin().to_string();
    let allow_origin = if allowed == "*" {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin_allowed(&allowed, origin)
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(config.allowed_methods().to_vec())
        .allow_credentials(config.allow_credentials())
}

/// Adds `Access-Control-Allow-Methods` to responses that lack it.
pub fn allow_methods_header(config: &ServiceConfig) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        methods_header_value(config.allowed_methods()),
    )
}

fn methods_header_value(methods: &[Method]) -> HeaderValue {
    let joined = methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    HeaderValue::from_str(&joined).unwrap_or_else(|_| {
        tracing::warn!(methods = %joined, "Unrepresentable method list, using default");
        HeaderValue::from_static(DEFAULT_ALLOW_METHODS)
    })
}
