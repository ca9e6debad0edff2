//! Command implementations and dispatch.

pub mod add;
pub mod init;
pub mod ls;
pub mod percolate;
pub mod rm;
mod shared;
pub mod status;

use std::process::ExitCode;

use super::args::Commands;

/// Dispatches to the selected subcommand.
pub fn run(command: Commands) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(&cmd),
        Commands::Add(cmd) => add::run(&cmd),
        Commands::Rm(cmd) => rm::run(&cmd),
        Commands::Ls(cmd) => ls::run(&cmd),
        Commands::Percolate(cmd) => percolate::run(&cmd),
        Commands::Status => status::run(),
    }
}
