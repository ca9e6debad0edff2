//! Candidate selection.
//!
//! Builds one disjunctive query against the extraction index from the
//! incoming document and returns every stored query it could possibly match.
//! Text, keyword, and ip values probe the `extracted_terms` postings; numeric
//! values probe the per-field min/max columns with a containment pair; and a
//! marker clause always pulls in queries whose extraction failed. The result
//! may over-approximate but must never miss a true match, so verification
//! decides the final answer.

use std::ops::Bound;

use perq_query::{Number, QueryExpr};
use perq_schema::{Document, FieldValue, Schema, encode};
use tantivy::{
    TantivyDocument, Term,
    collector::DocSetCollector,
    query::{BooleanQuery, Occur, Query, RangeQuery, TermQuery},
    schema::{IndexRecordOption, Value},
    tokenizer::TextAnalyzer,
};

use crate::{
    analyzer::tokenize,
    error::PercolateError,
    schema::{EXTRACTION_FAILED, QuerySchema},
};

/// A stored query that survived selection.
pub(crate) struct Candidate {
    /// The stored query id.
    pub id: String,
    /// The parsed query expression, ready for verification.
    pub query: QueryExpr,
}

/// Runs selection for one document and loads the surviving stored queries.
pub(crate) fn select_candidates(
    searcher: &tantivy::Searcher,
    schema: &QuerySchema,
    doc_schema: &Schema,
    analyzer: &mut TextAnalyzer,
    document: &Document,
) -> Result<Vec<Candidate>, PercolateError> {
    let query = build_selection_query(schema, doc_schema, analyzer, document);
    let addresses = searcher
        .search(&query, &DocSetCollector)
        .map_err(|e| PercolateError::search(&e))?;

    let mut sorted: Vec<_> = addresses.into_iter().collect();
    sorted.sort_by_key(|addr| (addr.segment_ord, addr.doc_id));

    let mut candidates = Vec::with_capacity(sorted.len());
    for address in sorted {
        let stored: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| PercolateError::search(&e))?;
        let Some(id) = stored.get_first(schema.query_id).and_then(|v| v.as_str()) else {
            continue;
        };
        let Some(payload) = stored.get_first(schema.query).and_then(|v| v.as_str()) else {
            tracing::warn!(query_id = id, "stored query has no payload, skipping");
            continue;
        };
        match serde_json::from_str::<QueryExpr>(payload) {
            Ok(query) => candidates.push(Candidate {
                id: id.to_string(),
                query,
            }),
            Err(err) => {
                tracing::warn!(query_id = id, error = %err, "unreadable stored query, skipping");
            }
        }
    }
    Ok(candidates)
}

/// Assembles the disjunction of probe clauses for a document.
fn build_selection_query(
    schema: &QuerySchema,
    doc_schema: &Schema,
    analyzer: &mut TextAnalyzer,
    document: &Document,
) -> BooleanQuery {
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

    // Queries whose extraction failed must always be candidates.
    clauses.push((
        Occur::Should,
        Box::new(TermQuery::new(
            Term::from_field_text(schema.extraction_status, EXTRACTION_FAILED),
            IndexRecordOption::Basic,
        )),
    ));

    for (name, values) in document.iter() {
        let Some(ty) = doc_schema.field_type(name) else {
            continue;
        };
        for value in values {
            match value {
                FieldValue::Text(s) => {
                    for token in tokenize(analyzer, s) {
                        clauses.push(term_probe(schema, name, &token));
                    }
                }
                FieldValue::Keyword(s) => clauses.push(term_probe(schema, name, s)),
                FieldValue::Ip(addr) => {
                    clauses.push(term_probe(schema, name, &addr.to_string()));
                }
                FieldValue::Integer(v) => {
                    if let Some(key) = encode::value_key(ty, Number::Int(*v)) {
                        if let Some(probe) = range_probe(schema, name, key) {
                            clauses.push(probe);
                        }
                    }
                }
                FieldValue::Float(v) => {
                    if let Some(key) = encode::value_key(ty, Number::Float(*v)) {
                        if let Some(probe) = range_probe(schema, name, key) {
                            clauses.push(probe);
                        }
                    }
                }
                FieldValue::Point { .. } => {}
            }
        }
    }

    BooleanQuery::new(clauses)
}

/// Probe for one posting in the extracted terms field.
fn term_probe(schema: &QuerySchema, field: &str, token: &str) -> (Occur, Box<dyn Query>) {
    (
        Occur::Should,
        Box::new(TermQuery::new(
            Term::from_field_text(schema.extracted_terms, &QuerySchema::encode_term(field, token)),
            IndexRecordOption::Basic,
        )),
    )
}

/// Probe for stored ranges containing one numeric key: min <= key <= max.
fn range_probe(schema: &QuerySchema, field: &str, key: i64) -> Option<(Occur, Box<dyn Query>)> {
    let (min_field, max_field) = schema.range_fields(field)?;
    let min_side = RangeQuery::new(
        Bound::Unbounded,
        Bound::Included(Term::from_field_i64(min_field, key)),
    );
    let max_side = RangeQuery::new(
        Bound::Included(Term::from_field_i64(max_field, key)),
        Bound::Unbounded,
    );
    let both: Vec<(Occur, Box<dyn Query>)> = vec![
        (Occur::Must, Box::new(min_side)),
        (Occur::Must, Box::new(max_side)),
    ];
    Some((Occur::Should, Box::new(BooleanQuery::new(both))))
}
