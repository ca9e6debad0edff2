//! Implementation of `perq add`.

use std::process::ExitCode;

use perq_query::{QueryError, parse};

use crate::cli::{args::AddCommand, context::CommandContext};

use super::shared::open_writer;

/// Parses a query and stores it under the given id.
pub fn run(cmd: &AddCommand) -> ExitCode {
    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let expr = match parse(&cmd.query) {
        Ok(expr) => expr,
        Err(QueryError::Lex(e)) => {
            eprintln!("error: {}", e.format_with_context());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut writer = match open_writer(&ctx) {
        Ok(writer) => writer,
        Err(code) => return code,
    };

    // Re-adding an id replaces the previous query.
    writer.delete_query(&cmd.id);
    if let Err(e) = writer.add_query(&cmd.id, &expr) {
        eprintln!("error: failed to store query: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = writer.commit() {
        eprintln!("error: failed to commit: {e}");
        return ExitCode::FAILURE;
    }

    println!("Stored query '{}'", cmd.id);
    ExitCode::SUCCESS
}
