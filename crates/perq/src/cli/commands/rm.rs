//! Implementation of `perq rm`.

use std::process::ExitCode;

use crate::cli::{args::RmCommand, context::CommandContext};

use super::shared::{open_percolator, open_writer};

/// Removes a stored query by id.
pub fn run(cmd: &RmCommand) -> ExitCode {
    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let percolator = match open_percolator(&ctx) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let exists = match percolator.list() {
        Ok(queries) => queries.iter().any(|q| q.id == cmd.id),
        Err(e) => {
            eprintln!("error: failed to list stored queries: {e}");
            return ExitCode::FAILURE;
        }
    };
    if !exists {
        eprintln!("error: no stored query with id '{}'", cmd.id);
        return ExitCode::FAILURE;
    }

    let mut writer = match open_writer(&ctx) {
        Ok(writer) => writer,
        Err(code) => return code,
    };
    writer.delete_query(&cmd.id);
    if let Err(e) = writer.commit() {
        eprintln!("error: failed to commit: {e}");
        return ExitCode::FAILURE;
    }

    println!("Removed query '{}'", cmd.id);
    ExitCode::SUCCESS
}
