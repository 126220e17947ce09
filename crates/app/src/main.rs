//! Platter terminal client

use std::process::ExitCode;

use platter_app::observability;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    // Logging is not up yet.
    if let Err(error) = observability::init_subscriber(&cli.config.logging) {
        eprintln!("{error}");

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");

            ExitCode::FAILURE
        }
    }
}
