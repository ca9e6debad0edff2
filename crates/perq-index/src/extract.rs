//! Conservative extraction analysis over query trees.
//!
//! `extract` walks a query AST and produces a summary of terms and ranges the
//! query requires to match. The summary is a superset-safe under-approximation:
//! a document matching the query is guaranteed to hit at least one extracted
//! clause, but hitting a clause does not guarantee the query matches. Queries
//! the analysis cannot summarize are marked [`Extraction::Failed`] and are
//! unconditionally carried to verification, never excluded.

use perq_query::{Number, QueryExpr};
use perq_schema::{FieldType, Schema, encode};
use tantivy::tokenizer::TextAnalyzer;

use crate::analyzer::tokenize;

/// One extracted requirement of a stored query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedClause {
    /// The document must contain `token` in `field`.
    Term {
        /// Document field name.
        field: String,
        /// Analyzed token.
        token: String,
    },
    /// The document must have a `field` value whose ordered key lies in
    /// `[min_key, max_key]`.
    Range {
        /// Document field name.
        field: String,
        /// Encoded lower endpoint (inclusive).
        min_key: i64,
        /// Encoded upper endpoint (inclusive).
        max_key: i64,
    },
}

/// The extraction summary of one stored query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// At least one clause was extracted; a matching document hits one of them.
    Clauses(Vec<ExtractedClause>),
    /// Nothing usable could be extracted; the query is always a candidate.
    Failed,
}

/// Extracts a conservative clause summary from a query.
pub fn extract(schema: &Schema, analyzer: &mut TextAnalyzer, expr: &QueryExpr) -> Extraction {
    match extract_inner(schema, analyzer, expr) {
        Some(clauses) if !clauses.is_empty() => Extraction::Clauses(clauses),
        _ => Extraction::Failed,
    }
}

/// Recursive worker: `None` means unextractable.
fn extract_inner(
    schema: &Schema,
    analyzer: &mut TextAnalyzer,
    expr: &QueryExpr,
) -> Option<Vec<ExtractedClause>> {
    match expr {
        QueryExpr::Term { field, value } => extract_term(schema, analyzer, field, value),
        QueryExpr::Range { field, lo, hi } => extract_range(schema, field, *lo, *hi),
        QueryExpr::GeoDistance { .. } => None,
        QueryExpr::And(subs) => {
            // Every extracted clause of a conjunction is individually required,
            // so the union of whatever sub-clauses could be extracted is a
            // valid filter. Only a conjunction with no extractable sub-clause
            // at all must fall back to always-candidate.
            let clauses: Vec<ExtractedClause> = subs
                .iter()
                .filter_map(|sub| extract_inner(schema, analyzer, sub))
                .flatten()
                .collect();
            (!clauses.is_empty()).then_some(clauses)
        }
        QueryExpr::Or(subs) => {
            // A disjunction is only filterable if every branch is: a document
            // may match solely through an unextractable branch.
            let mut clauses = Vec::new();
            for sub in subs {
                clauses.extend(extract_inner(schema, analyzer, sub)?);
            }
            (!clauses.is_empty()).then_some(clauses)
        }
    }
}

/// Extracts a term clause, according to the field's declared type.
fn extract_term(
    schema: &Schema,
    analyzer: &mut TextAnalyzer,
    field: &str,
    value: &str,
) -> Option<Vec<ExtractedClause>> {
    let clause_term = |token: String| ExtractedClause::Term {
        field: field.to_string(),
        token,
    };

    match schema.field_type(field)? {
        FieldType::Text => {
            // A multi-token value requires all its tokens; emitting each as a
            // clause over-approximates (any one selects the query).
            let tokens = tokenize(analyzer, value);
            (!tokens.is_empty()).then(|| tokens.into_iter().map(clause_term).collect())
        }
        FieldType::Keyword => Some(vec![clause_term(value.to_string())]),
        FieldType::Ip => {
            // Canonical form so "::1" and "0:0:0:0:0:0:0:1" extract equally.
            let addr: std::net::IpAddr = value.parse().ok()?;
            Some(vec![clause_term(addr.to_string())])
        }
        ty if ty.is_numeric() => {
            // Numeric equality is a degenerate range.
            let number = parse_number(value)?;
            let key = encode::value_key(ty, number)?;
            Some(vec![ExtractedClause::Range {
                field: field.to_string(),
                min_key: key,
                max_key: key,
            }])
        }
        _ => None,
    }
}

/// Extracts a range clause over a numeric field.
fn extract_range(
    schema: &Schema,
    field: &str,
    lo: Number,
    hi: Number,
) -> Option<Vec<ExtractedClause>> {
    let ty = schema.field_type(field)?;
    if !ty.is_numeric() {
        return None;
    }
    let min_key = encode::lower_key(ty, lo)?;
    let max_key = encode::upper_key(ty, hi)?;
    Some(vec![ExtractedClause::Range {
        field: field.to_string(),
        min_key,
        max_key,
    }])
}

/// Parses a term value as a numeric literal.
fn parse_number(value: &str) -> Option<Number> {
    if let Ok(int) = value.parse::<i64>() {
        return Some(Number::Int(int));
    }
    let float = value.parse::<f64>().ok()?;
    float.is_finite().then_some(Number::Float(float))
}
