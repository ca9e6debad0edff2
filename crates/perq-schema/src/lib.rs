//! Field schema, configuration, and document model for perq.
//!
//! perq is configured by a `perq.toml` file declaring the stored-query index
//! location and the typed fields that documents and queries may use:
//!
//! ```toml
//! index = ".perq/index"
//!
//! [fields]
//! greeting = "text"
//! int_field = "integer"
//! location = "geo_point"
//! ```
//!
//! This crate owns:
//! - [`FieldType`] and [`Schema`]: the type tags that drive extraction and
//!   indexing strategy selection
//! - [`Config`]: `perq.toml` loading
//! - [`Document`]: the ephemeral incoming document of a single percolate call
//! - [`encode`]: order-preserving numeric key normalization

#![warn(missing_docs)]

mod config;
mod document;
pub mod encode;
mod error;
mod types;

pub use config::{CONFIG_FILENAME, Config};
pub use document::{Document, FieldValue};
pub use error::{ConfigError, DocumentError};
pub use types::{FieldType, Schema};
