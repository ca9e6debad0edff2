//! Implementation of `perq percolate`.

use std::{fs, io::Read, process::ExitCode};

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::{args::PercolateCommand, context::CommandContext};

use super::shared::open_percolator;

/// Matches one JSON document against all stored queries.
pub fn run(cmd: &PercolateCommand) -> ExitCode {
    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let contents = match read_document(&cmd.document) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("error: failed to read document: {e}");
            return ExitCode::FAILURE;
        }
    };
    let json: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: document is not valid JSON: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut percolator = match open_percolator(&ctx) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let matches = match percolator.percolate_json(&json) {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.output.json {
        match serde_json::to_string_pretty(&matches) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize output: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if matches.is_empty() {
        println!("No matching queries.");
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Id", "Score"]);
    for m in &matches {
        table.add_row(vec![m.id.clone(), format!("{:.3}", m.score)]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}

/// Reads the document from a file path, or stdin when the path is `-`.
fn read_document(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}
