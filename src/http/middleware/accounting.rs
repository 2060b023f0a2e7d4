//! Request accounting middleware.
//! Feeds every finished request into the metrics facade.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::ServiceConfig;
use crate::observability::metrics;

pub async fn request_accounting(
    State(config): State<Arc<ServiceConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_request(
        config.service_name(),
        &method,
        response.status().as_u16(),
        start,
    );
    response
}
