//! The services deployed from this repository.

use crate::config::resolver::port_variable;

/// Greeting served at `/` by the NestJS services.
pub const DEFAULT_GREETING: &str = "Hello World!";

/// Identity and defaults of one deployable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Unique service name, also the `service` label and health field.
    pub name: &'static str,
    /// Port used when `<NAME>_PORT` is absent or invalid.
    pub default_port: u16,
    /// Body of `GET /`.
    pub greeting: &'static str,
    /// Name of the static metrics line.
    pub metric_name: &'static str,
    /// Extra path serving the same body as `/metrics`.
    pub metrics_alias: Option<&'static str>,
}

impl ServiceSpec {
    /// Environment variable overriding the port.
    pub fn port_variable(&self) -> String {
        port_variable(self.name)
    }

    /// Find a catalog entry by name.
    pub fn lookup(name: &str) -> Option<&'static ServiceSpec> {
        CATALOG.iter().find(|spec| spec.name == name)
    }
}

pub const API_GATEWAY: ServiceSpec = ServiceSpec {
    name: "api-gateway",
    default_port: 4000,
    greeting: DEFAULT_GREETING,
    metric_name: "nestjs_example_metric",
    metrics_alias: None,
};

pub const AUTH_SERVICE: ServiceSpec = ServiceSpec {
    name: "auth-service",
    default_port: 3001,
    greeting: DEFAULT_GREETING,
    metric_name: "nestjs_example_metric",
    metrics_alias: None,
};

pub const CONTRACTS_SERVICE: ServiceSpec = ServiceSpec {
    name: "contracts-service",
    default_port: 3002,
    greeting: DEFAULT_GREETING,
    metric_name: "nestjs_example_metric",
    metrics_alias: None,
};

pub const TEMPLATES_SERVICE: ServiceSpec = ServiceSpec {
    name: "templates-service",
    default_port: 3003,
    greeting: DEFAULT_GREETING,
    metric_name: "nestjs_example_metric",
    metrics_alias: None,
};

pub const WEB_FRONTEND: ServiceSpec = ServiceSpec {
    name: "web-frontend",
    default_port: 3000,
    greeting: DEFAULT_GREETING,
    metric_name: "nextjs_example_metric",
    metrics_alias: Some("/api/metrics"),
};

pub static CATALOG: [ServiceSpec; 5] = [
    API_GATEWAY,
    AUTH_SERVICE,
    CONTRACTS_SERVICE,
    TEMPLATES_SERVICE,
    WEB_FRONTEND,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_and_ports_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|s| s.name).collect();
        let ports: HashSet<_> = CATALOG.iter().map(|s| s.default_port).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(ports.len(), CATALOG.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(ServiceSpec::lookup("auth-service"), Some(&AUTH_SERVICE));
        assert_eq!(ServiceSpec::lookup("billing-service"), None);
    }

    #[test]
    fn test_only_web_frontend_has_a_metrics_alias() {
        let aliased: Vec<_> = CATALOG
            .iter()
            .filter_map(|s| s.metrics_alias.map(|path| (s.name, path)))
            .collect();
        assert_eq!(aliased, vec![("web-frontend", "/api/metrics")]);
    }

    #[test]
    fn test_port_variables() {
        assert_eq!(API_GATEWAY.port_variable(), "API_GATEWAY_PORT");
        assert_eq!(AUTH_SERVICE.port_variable(), "AUTH_SERVICE_PORT");
        assert_eq!(TEMPLATES_SERVICE.port_variable(), "TEMPLATES_SERVICE_PORT");
        assert_eq!(WEB_FRONTEND.port_variable(), "WEB_FRONTEND_PORT");
    }
}
