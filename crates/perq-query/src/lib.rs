//! Query parsing and AST for perq percolation.
//!
//! This crate provides the query language used for stored queries:
//!
//! - **Field terms**: `greeting:happy` - the field must contain the term
//! - **Quoted values**: `label:"new york"` - verbatim value for keyword fields
//! - **Ranges**: `int_field:[0 TO 5]` - numeric field within an inclusive range
//! - **Geo distance**: `location:geo(6.927, 79.861, 30000)` - point within
//!   `meters` of a center (lat, lon)
//! - **AND**: implicit between adjacent clauses, or the explicit keyword
//! - **OR**: `greeting:hi OR greeting:bye` - alternatives
//! - **Grouping**: `(a:x b:y) OR c:z` - precedence control
//!
//! # Example
//!
//! ```
//! use perq_query::parse;
//!
//! let expr = parse("greeting:hi OR (int_field:[1 TO 10] rating:good)").unwrap();
//! println!("{expr}");
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{Number, QueryExpr};
pub use error::{LexError, ParseError, QueryError};
pub use lexer::{Token, tokenize};
pub use parser::parse;
