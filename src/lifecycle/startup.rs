//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate settings
//! - Initialize logging, then resolve the service config
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and exits non-zero
//! - Listeners start last (traffic only when ready)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::config::{load_or_default, ConfigError};
use crate::http::ShellError;
use crate::lifecycle::signals;
use crate::observability::init_logging;
use crate::service::{ServiceInstance, ServiceSpec};

/// Flags accepted by every per-service binary.
#[derive(Debug, Parser)]
#[command(version, about = "Run this service's HTTP shell")]
pub struct LaunchArgs {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),

    #[error(transparent)]
    Shell(#[from] ShellError),
}

/// Run `spec` until SIGINT/SIGTERM.
pub async fn run(spec: ServiceSpec, config_path: Option<&Path>) -> Result<(), StartupError> {
    let settings = load_or_default(config_path)?;
    init_logging(&settings.observability)?;

    let instance = ServiceInstance::from_env(spec);
    let config = instance.config();
    tracing::info!(
        service = %config.service_name(),
        port = config.listen_port(),
        port_variable = %spec.port_variable(),
        cors_origin = %config.cors_origin(),
        metrics_mode = ?settings.observability.metrics_mode,
        "Configuration loaded"
    );

    let terminate = signals::terminate();
    let handle = instance.into_shell(&settings).start().await?;

    let shutdown = handle.shutdown_trigger();
    tokio::spawn(async move {
        terminate.await;
        shutdown.trigger();
    });

    handle.wait().await?;
    tracing::info!(service = spec.name, "Shutdown complete");
    Ok(())
}

/// Run `spec` and map the outcome to a process exit code.
pub async fn launch(spec: ServiceSpec, config_path: Option<&Path>) -> ExitCode {
    match run(spec, config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match &err {
                // The subscriber may not exist yet.
                StartupError::Config(_) | StartupError::Logging(_) => {
                    eprintln!("{}: {err}", spec.name);
                }
                StartupError::Shell(_) => {
                    tracing::error!(service = spec.name, error = %err, "Service failed");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::catalog::AUTH_SERVICE;

    #[test]
    fn test_launch_args() {
        let args = LaunchArgs::parse_from(["auth-service", "--config", "shell.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("shell.toml")));

        let args = LaunchArgs::parse_from(["auth-service"]);
        assert_eq!(args.config, None);
    }

    #[tokio::test]
    async fn test_missing_settings_file_is_fatal() {
        let result = run(AUTH_SERVICE, Some(Path::new("/nonexistent/shell.toml"))).await;
        assert!(matches!(result, Err(StartupError::Config(ConfigError::Io { .. }))));
    }
}
