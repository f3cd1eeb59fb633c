mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::{exit_code_for, CliError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let settings = ferrocast_core::Settings::from_env()?;

    let envelope = commands::run(&cli, &settings).await?;
    output::render(&mut std::io::stdout().lock(), &envelope, cli.format, cli.pretty)?;

    match envelope.errors.first() {
        Some(error) => Ok(ExitCode::from(exit_code_for(&error.code))),
        None => Ok(ExitCode::SUCCESS),
    }
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ferrocast=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
