//! Implementation of `perq init`.

use std::{fs, process::ExitCode};

use perq_schema::CONFIG_FILENAME;

use crate::cli::{args::InitCommand, context::current_dir_or_failure};

/// Default configuration template with commented examples.
const CONFIG_TEMPLATE: &str = include_str!("../../../templates/config.toml");

/// Writes a starter `perq.toml` into the current directory.
pub fn run(cmd: &InitCommand) -> ExitCode {
    let cwd = match current_dir_or_failure() {
        Ok(cwd) => cwd,
        Err(code) => return code,
    };
    let config_path = cwd.join(CONFIG_FILENAME);

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    if let Err(e) = fs::write(&config_path, CONFIG_TEMPLATE) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    ExitCode::SUCCESS
}
