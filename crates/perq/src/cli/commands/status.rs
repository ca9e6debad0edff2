//! Implementation of `perq status`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

use super::shared::open_percolator;

/// Shows the configuration in use and index statistics.
pub fn run() -> ExitCode {
    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    println!("Config: {}", ctx.config_path.display());
    println!("Index:  {}", ctx.config.index.display());
    println!();

    println!("Fields:");
    for (name, ty) in ctx.config.fields.iter() {
        println!("  {name} ({})", ty.name());
    }
    println!();

    if !ctx.config.index.is_dir() {
        println!("Index not created yet. Run 'perq add' to store a query.");
        return ExitCode::SUCCESS;
    }

    let percolator = match open_percolator(&ctx) {
        Ok(p) => p,
        Err(code) => return code,
    };
    println!("Stored queries: {}", percolator.num_queries());
    ExitCode::SUCCESS
}
