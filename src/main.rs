//! Service Shell
//!
//! Runs any service from the catalog behind the shared HTTP shell.
//!
//! # Architecture Overview
//!
//! ```text
//!   environment ──▶ config::resolver ──▶ ServiceConfig ─┐
//!   settings.toml ─▶ config::loader ───▶ ShellSettings ─┤
//!                                                       ▼
//!                                              http::ServiceShell
//!                                                       │
//!     Client ──▶ request id ─▶ trace ─▶ timeout ─▶ body limit ─▶ CORS ─▶ accounting
//!                                                       │
//!                                  ┌────────────────────┼────────────────────┐
//!                                  ▼                    ▼                    ▼
//!                              GET /             GET /health          GET /metrics
//!                            (greeting)        (status + time)     (text exposition)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use service_shell::lifecycle::startup;
use service_shell::service::{ServiceSpec, CATALOG};

#[derive(Parser)]
#[command(name = "service-shell")]
#[command(about = "Run a service from the catalog behind the shared HTTP shell", long_about = None)]
#[command(version)]
struct Cli {
    /// Service to run (see --list)
    #[arg(required_unless_present = "list")]
    service: Option<String>,

    /// Settings file (TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List known services and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list {
        println!("{:<20} {:>6}  {}", "SERVICE", "PORT", "OVERRIDE");
        for spec in CATALOG.iter() {
            println!(
                "{:<20} {:>6}  {}",
                spec.name,
                spec.default_port,
                spec.port_variable()
            );
        }
        return ExitCode::SUCCESS;
    }

    let Some(name) = cli.service else {
        return ExitCode::FAILURE;
    };

    match ServiceSpec::lookup(&name) {
        Some(spec) => startup::launch(*spec, cli.config.as_deref()).await,
        None => {
            eprintln!("unknown service '{name}'; run with --list to see available services");
            ExitCode::FAILURE
        }
    }
}
