//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or SIGTERM
//! - Translate either into a single shutdown event
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGTERM is registered when `terminate` is called, not when first polled,
//!   so a signal arriving right after the listener binds is not lost
//! - A handler that cannot be installed is logged and never fires

use std::future::{self, Future};

/// Resolves when the process is asked to terminate.
///
/// Must be called inside a Tokio runtime.
pub fn terminate() -> impl Future<Output = ()> + Send + 'static {
    #[cfg(unix)]
    let sigterm = {
        use tokio::signal::unix::{signal, SignalKind};

        let stream = signal(SignalKind::terminate());
        async move {
            match stream {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to install SIGTERM handler");
                    future::pending::<()>().await;
                }
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = future::pending::<()>();

    async move {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "Failed to install Ctrl+C handler");
                future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = ctrl_c => tracing::info!("SIGINT received, shutting down"),
            _ = sigterm => tracing::info!("SIGTERM received, shutting down"),
        }
    }
}
