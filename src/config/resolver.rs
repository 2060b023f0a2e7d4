//! Per-service runtime settings resolved from the environment.
//!
//! # Responsibilities
//! - Derive the `<SERVICE>_PORT` variable name from the service name
//! - Resolve the listen port, falling back to the service default
//! - Resolve the allowed CORS origin from `CORS_ORIGIN`
//!
//! # Design Decisions
//! - Resolution never fails; invalid values fall back to defaults
//! - A present-but-invalid value is logged, the contract is unchanged
//! - The environment is read once here, never from a handler

use axum::http::Method;
use url::Url;

/// Environment variable holding the allowed CORS origin.
pub const CORS_ORIGIN_VAR: &str = "CORS_ORIGIN";

/// Origin used when `CORS_ORIGIN` is absent or empty.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Methods advertised by every service's CORS policy.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Resolved runtime settings for one service process.
///
/// Built once at startup and shared read-only afterwards. Fields are private
/// so nothing can rebind the port after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    service_name: String,
    listen_port: u16,
    cors_origin: String,
    allowed_methods: Vec<Method>,
}

impl ServiceConfig {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn listen_port(&self) -> u16 {
        self.listen_port
    }

    /// Allowed origin, either an absolute URL or `*`.
    pub fn cors_origin(&self) -> &str {
        &self.cors_origin
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    /// Credentialed requests are always allowed.
    pub fn allow_credentials(&self) -> bool {
        true
    }
}

/// Name of the port variable for a service, e.g. `auth-service` → `AUTH_SERVICE_PORT`.
pub fn port_variable(service_name: &str) -> String {
    let mut name: String = service_name
        .chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    name.push_str("_PORT");
    name
}

/// Resolve settings for `service_name` from the process environment.
pub fn resolve(service_name: &str, default_port: u16) -> ServiceConfig {
    resolve_with(service_name, default_port, |key| std::env::var(key).ok())
}

/// Resolve settings using `lookup` as the variable source.
pub fn resolve_with<F>(service_name: &str, default_port: u16, lookup: F) -> ServiceConfig
where
    F: Fn(&str) -> Option<String>,
{
    let port_var = port_variable(service_name);

    let listen_port = match lookup(&port_var) {
        Some(raw) if !raw.trim().is_empty() => match parse_port(&raw) {
            Some(port) => port,
            None => {
                tracing::warn!(
                    variable = %port_var,
                    value = %raw,
                    default_port,
                    "Invalid port value, using default"
                );
                default_port
            }
        },
        _ => default_port,
    };

    let cors_origin = match lookup(CORS_ORIGIN_VAR) {
        Some(origin) if !origin.trim().is_empty() => origin.trim().to_string(),
        _ => DEFAULT_CORS_ORIGIN.to_string(),
    };

    if cors_origin != "*" && Url::parse(&cors_origin).is_err() {
        tracing::warn!(
            origin = %cors_origin,
            "CORS origin is neither '*' nor an absolute URL; browsers will never match it"
        );
    }

    ServiceConfig {
        service_name: service_name.to_string(),
        listen_port,
        cors_origin,
        allowed_methods: ALLOWED_METHODS.to_vec(),
    }
}

/// Parse a port in `1..=65535`.
fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port != 0)
}
