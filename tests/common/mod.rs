//! Shared utilities for integration tests.

use std::collections::HashMap;

use service_shell::{ServiceInstance, ServiceSpec, ShellHandle, ShellSettings};
use tokio::net::TcpListener;

/// Start `spec` on an ephemeral loopback port with `env` as its environment.
pub async fn start_service(spec: ServiceSpec, env: &[(&str, &str)]) -> ShellHandle {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let instance = ServiceInstance::with_lookup(spec, move |key| env.get(key).cloned());
    let shell = instance.into_shell(&ShellSettings::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    shell.start_with_listener(listener).unwrap()
}

/// Client that never goes through a proxy and never reuses connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn url(handle: &ShellHandle, path: &str) -> String {
    format!("http://{}{}", handle.local_addr(), path)
}
