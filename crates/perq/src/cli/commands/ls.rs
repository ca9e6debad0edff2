//! Implementation of `perq ls`.

use std::process::ExitCode;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::{args::LsCommand, context::CommandContext};

use super::shared::open_percolator;

/// Lists all stored queries.
pub fn run(cmd: &LsCommand) -> ExitCode {
    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let percolator = match open_percolator(&ctx) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let queries = match percolator.list() {
        Ok(queries) => queries,
        Err(e) => {
            eprintln!("error: failed to list stored queries: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.output.json {
        match serde_json::to_string_pretty(&queries) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize output: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if queries.is_empty() {
        println!("No stored queries.");
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Id", "Query", "Status"]);
    for query in &queries {
        table.add_row(vec![&query.id, &query.query, &query.status]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
