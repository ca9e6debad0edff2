//! Helpers shared between command implementations.

use std::process::ExitCode;

use perq_index::{Percolator, QueryWriter};

use crate::cli::context::CommandContext;

/// Opens the stored-query index for writing, printing errors consistently.
pub fn open_writer(ctx: &CommandContext) -> Result<QueryWriter, ExitCode> {
    QueryWriter::open(&ctx.config.index, &ctx.config.fields).map_err(|e| {
        eprintln!("error: failed to open index: {e}");
        ExitCode::FAILURE
    })
}

/// Opens the stored-query index for percolation, printing errors consistently.
pub fn open_percolator(ctx: &CommandContext) -> Result<Percolator, ExitCode> {
    Percolator::open(&ctx.config.index, &ctx.config.fields).map_err(|e| {
        eprintln!("error: failed to open index: {e}");
        ExitCode::FAILURE
    })
}
