//! Command-line interface for the `perq` percolation tool.

use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::{args::Cli, commands};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::run(cli.command)
}
