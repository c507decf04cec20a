//! farmdash: command-line front end for the farm operations dashboard.

use clap::Parser;

mod cli;
mod commands;
mod render;
mod reporter;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = utils::logging::init(utils::logging::level_for_verbosity(cli.verbose)) {
        eprintln!("error: failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = commands::run(cli).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
