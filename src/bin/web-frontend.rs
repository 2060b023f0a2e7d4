use std::process::ExitCode;

use clap::Parser;
use service_shell::lifecycle::{launch, LaunchArgs};
use service_shell::service::catalog::WEB_FRONTEND;

#[tokio::main]
async fn main() -> ExitCode {
    let args = LaunchArgs::parse();
    launch(WEB_FRONTEND, args.config.as_deref()).await
}
