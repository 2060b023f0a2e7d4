use std::process::ExitCode;

use clap::Parser;
use service_shell::lifecycle::{launch, LaunchArgs};
use service_shell::service::catalog::API_GATEWAY;

#[tokio::main]
async fn main() -> ExitCode {
    let args = LaunchArgs::parse();
    launch(API_GATEWAY, args.config.as_deref()).await
}
