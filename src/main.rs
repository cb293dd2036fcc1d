mod args;
mod cli;
mod commands;
mod error;
mod export;
mod filedb;
mod output;
mod reader;
mod schema;
mod splitter;

use clap::{CommandFactory, Parser};
use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = match args::resolve_arguments(&cli) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n", e);
            if e.is_usage_error() {
                let _ = Cli::command().print_help();
            }
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
