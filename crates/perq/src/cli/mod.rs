//! CLI support for the `perq` binary.

pub mod args;
pub mod commands;
pub mod context;

pub use context::CommandContext;
