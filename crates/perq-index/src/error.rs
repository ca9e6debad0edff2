//! Error types for the perq-index crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when working with the stored-query index or while
/// percolating a document against it.
#[derive(Debug, Error)]
pub enum PercolateError {
    /// Failed to open or create the stored-query index.
    #[error("failed to open query index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The index on disk was built with a different field schema.
    #[error("query index at {path} was built with a different schema; rebuild it")]
    SchemaMismatch {
        /// Path to the index directory.
        path: PathBuf,
    },

    /// Failed to write to the index.
    #[error("failed to write to query index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit query index: {0}")]
    Commit(String),

    /// Failed to execute a search against an index.
    #[error("search failed: {0}")]
    Search(String),

    /// The incoming document is malformed. Fatal to the whole percolate
    /// call: the document is the single unit of work.
    #[error(transparent)]
    Document(#[from] perq_schema::DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PercolateError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Search` error from a Tantivy error.
    pub(crate) fn search(source: &tantivy::TantivyError) -> Self {
        Self::Search(source.to_string())
    }
}
