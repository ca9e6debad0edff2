//! Candidate verification.
//!
//! Selection is allowed to over-approximate, so every candidate is re-checked
//! by executing its full query against the transient one-document index. Term
//! and range leaves run as real tantivy queries; geo distance is computed
//! directly against the document's points since the transient index does not
//! carry them. A candidate matches only if the whole expression matches, and
//! its score is the sum of the scores of the leaves that contributed.

use std::ops::Bound;

use perq_query::{Number, QueryExpr};
use perq_schema::{Document, FieldValue, FieldType, encode};
use tantivy::{
    Term,
    collector::TopDocs,
    query::{BooleanQuery, Occur, Query, RangeQuery, TermQuery},
    schema::IndexRecordOption,
    tokenizer::TextAnalyzer,
};

use crate::{analyzer::tokenize, document::DocumentIndex, error::PercolateError};

/// Mean earth radius in meters, for haversine distance.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Score assigned to a matching geo distance leaf.
const GEO_MATCH_SCORE: f32 = 1.0;

/// Evaluates a stored query against the transient index.
///
/// Returns `Some(score)` if the document satisfies the expression and `None`
/// otherwise.
pub(crate) fn verify(
    index: &DocumentIndex,
    document: &Document,
    analyzer: &mut TextAnalyzer,
    expr: &QueryExpr,
) -> Result<Option<f32>, PercolateError> {
    match expr {
        QueryExpr::Term { field, value } => verify_term(index, analyzer, field, value),
        QueryExpr::Range { field, lo, hi } => verify_range(index, field, *lo, *hi),
        QueryExpr::GeoDistance {
            field,
            lat,
            lon,
            meters,
        } => Ok(verify_geo(document, field, *lat, *lon, *meters)),
        QueryExpr::And(children) => {
            let mut total = 0.0;
            for child in children {
                match verify(index, document, analyzer, child)? {
                    Some(score) => total += score,
                    None => return Ok(None),
                }
            }
            Ok(Some(total))
        }
        QueryExpr::Or(children) => {
            let mut total = 0.0;
            let mut matched = false;
            for child in children {
                if let Some(score) = verify(index, document, analyzer, child)? {
                    total += score;
                    matched = true;
                }
            }
            Ok(matched.then_some(total))
        }
    }
}

/// Runs a term leaf against the transient index.
fn verify_term(
    index: &DocumentIndex,
    analyzer: &mut TextAnalyzer,
    field_name: &str,
    value: &str,
) -> Result<Option<f32>, PercolateError> {
    let (Some(field), Some(ty)) = (index.field(field_name), index.field_type(field_name)) else {
        return Ok(None);
    };

    let terms: Vec<Term> = match ty {
        FieldType::Text => tokenize(analyzer, value)
            .into_iter()
            .map(|token| Term::from_field_text(field, &token))
            .collect(),
        FieldType::Keyword => vec![Term::from_field_text(field, value)],
        FieldType::Ip => match value.parse::<std::net::IpAddr>() {
            Ok(addr) => vec![Term::from_field_text(field, &addr.to_string())],
            Err(_) => return Ok(None),
        },
        ty if ty.is_numeric() => {
            let number = match parse_number(value) {
                Some(n) => n,
                None => return Ok(None),
            };
            match encode::value_key(ty, number) {
                Some(key) => vec![Term::from_field_i64(field, key)],
                None => return Ok(None),
            }
        }
        _ => return Ok(None),
    };

    if terms.is_empty() {
        return Ok(None);
    }

    // A multi-token text value requires every token to be present.
    let clauses: Vec<(Occur, Box<dyn Query>)> = terms
        .into_iter()
        .map(|term| {
            let query: Box<dyn Query> =
                Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
            (Occur::Must, query)
        })
        .collect();
    run_scored(index, &BooleanQuery::new(clauses))
}

/// Runs a numeric range leaf against the transient index.
fn verify_range(
    index: &DocumentIndex,
    field_name: &str,
    lo: Number,
    hi: Number,
) -> Result<Option<f32>, PercolateError> {
    let (Some(field), Some(ty)) = (index.field(field_name), index.field_type(field_name)) else {
        return Ok(None);
    };
    if !ty.is_numeric() {
        return Ok(None);
    }
    let (Some(lo_key), Some(hi_key)) = (encode::lower_key(ty, lo), encode::upper_key(ty, hi))
    else {
        return Ok(None);
    };
    if lo_key > hi_key {
        return Ok(None);
    }

    let query = RangeQuery::new(
        Bound::Included(Term::from_field_i64(field, lo_key)),
        Bound::Included(Term::from_field_i64(field, hi_key)),
    );
    run_scored(index, &query)
}

/// Checks whether any document point falls within the radius.
fn verify_geo(document: &Document, field_name: &str, lat: f64, lon: f64, meters: f64) -> Option<f32> {
    let values = document.get(field_name);
    let within = values.iter().any(|value| match value {
        FieldValue::Point { lat: p_lat, lon: p_lon } => {
            haversine_meters(lat, lon, *p_lat, *p_lon) <= meters
        }
        _ => false,
    });
    within.then_some(GEO_MATCH_SCORE)
}

/// Executes a query against the single-document index and returns its score.
fn run_scored(index: &DocumentIndex, query: &dyn Query) -> Result<Option<f32>, PercolateError> {
    let hits = index
        .searcher()
        .search(query, &TopDocs::with_limit(1))
        .map_err(|e| PercolateError::search(&e))?;
    Ok(hits.first().map(|(score, _)| *score))
}

/// Parses a term value as a number, matching the query grammar.
fn parse_number(value: &str) -> Option<Number> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(Number::Int(v));
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Number::Float(v)),
        _ => None,
    }
}

/// Great-circle distance between two points, in meters.
fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_METERS
}
