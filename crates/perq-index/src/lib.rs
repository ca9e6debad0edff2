//! Tantivy-based stored-query index for perq.
//!
//! This crate implements percolation: instead of indexing documents and
//! running queries against them, it indexes queries and runs documents
//! against them. It handles:
//! - Conservative clause extraction from stored queries
//! - Writing stored queries to an on-disk extraction index
//! - Candidate selection for an incoming document
//! - Verification against a transient one-document index
//! - Schema fingerprinting so an index is never reused across schema changes
//!
//! # Example
//!
//! ```no_run
//! use perq_index::{Percolator, QueryWriter};
//! use perq_query::parse;
//! use perq_schema::{Document, FieldType, FieldValue, Schema};
//!
//! let schema = Schema::new([("greeting".to_string(), FieldType::Text)]);
//!
//! let mut writer = QueryWriter::open("./queries".as_ref(), &schema).unwrap();
//! writer.add_query("q1", &parse("greeting:happy").unwrap()).unwrap();
//! writer.commit().unwrap();
//!
//! let mut percolator = Percolator::open("./queries".as_ref(), &schema).unwrap();
//! let mut doc = Document::new();
//! doc.add("greeting", FieldValue::Text("happy holidays".to_string()));
//! for m in percolator.percolate(&doc).unwrap() {
//!     println!("{} ({:.3})", m.id, m.score);
//! }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod document;
mod error;
mod extract;
mod percolator;
mod schema;
mod schema_hash;
mod select;
mod verify;
mod writer;

pub use analyzer::{build_analyzer, tokenize};
pub use document::DocumentIndex;
pub use error::PercolateError;
pub use extract::{ExtractedClause, Extraction, extract};
pub use percolator::{Percolator, QueryMatch, StoredQuery};
pub use schema::{EXTRACTION_COMPLETE, EXTRACTION_FAILED, QuerySchema};
pub use schema_hash::{Manifest, schema_fingerprint};
pub use writer::QueryWriter;
