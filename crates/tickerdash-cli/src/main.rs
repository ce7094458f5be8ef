mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
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
    init_tracing(&cli.command);

    let result = commands::run(&cli).await?;
    output::render(&result, cli.format, cli.pretty)?;

    if result.has_error_banner() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr; `RUST_LOG` overrides the per-command default level.
fn init_tracing(command: &Command) {
    let default_level = match command {
        Command::Serve(_) => "info",
        _ => "warn",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
