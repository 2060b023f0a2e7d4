use std::process::ExitCode;

use clap::Parser;
use service_shell::lifecycle::{launch, LaunchArgs};
use service_shell::service::catalog::AUTH_SERVICE;

#[tokio::main]
async fn main() -> ExitCode {
    let args = LaunchArgs::parse();
    launch(AUTH_SERVICE, args.config.as_deref()).await
}
