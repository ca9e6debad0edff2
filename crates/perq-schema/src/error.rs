//! Error types for perq configuration and documents.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: Box<de::Error>,
    },

    /// The configuration declares no fields.
    #[error("config file {path} declares no [fields]")]
    NoFields {
        /// Path to the offending file.
        path: PathBuf,
    },
}

/// Errors that can occur when converting an incoming document.
///
/// Any of these is fatal to the percolate call that carries the document:
/// the document is the single unit of work, so a partially converted
/// document must never produce a partial match result.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document payload is not a JSON object.
    #[error("document must be a JSON object")]
    NotAnObject,

    /// The document uses a field the schema does not declare.
    #[error("document field {field:?} is not declared in the schema")]
    UndeclaredField {
        /// The undeclared field name.
        field: String,
    },

    /// A field value does not fit the declared field type.
    #[error("invalid value for field {field:?}: {message}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// What was wrong with the value.
        message: String,
    },
}

impl DocumentError {
    /// Creates an `InvalidValue` error.
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
