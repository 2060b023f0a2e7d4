//! One deployed service: catalog entry + resolved config + shell.

use axum::Router;

use crate::config::{resolve, resolve_with, ServiceConfig, ShellSettings};
use crate::http::{Endpoints, ServiceShell};
use crate::observability::build_exposition;
use crate::service::catalog::ServiceSpec;

#[derive(Debug, Clone)]
pub struct ServiceInstance {
    spec: ServiceSpec,
    config: ServiceConfig,
}

impl ServiceInstance {
    /// Resolve the instance's config from the process environment.
    pub fn from_env(spec: ServiceSpec) -> Self {
        let config = resolve(spec.name, spec.default_port);
        Self { spec, config }
    }

    /// Resolve the instance's config through `lookup`.
    pub fn with_lookup<F>(spec: ServiceSpec, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = resolve_with(spec.name, spec.default_port, lookup);
        Self { spec, config }
    }

    pub fn spec(&self) -> &ServiceSpec {
        &self.spec
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build the shell serving the observability endpoints.
    pub fn into_shell(self, settings: &ShellSettings) -> ServiceShell {
        let exposition = build_exposition(
            settings.observability.metrics_mode,
            self.spec.metric_name,
            self.spec.name,
        );
        let mut endpoints = Endpoints::new(self.spec.greeting, exposition);
        if let Some(alias) = self.spec.metrics_alias {
            endpoints = endpoints.with_metrics_alias(alias);
        }

        ServiceShell::new(self.config, settings.listener.clone(), endpoints)
    }

    /// Build the shell with additional business routes.
    pub fn into_shell_with(self, settings: &ShellSettings, routes: Router) -> ServiceShell {
        self.into_shell(settings).merge(routes)
    }
}
