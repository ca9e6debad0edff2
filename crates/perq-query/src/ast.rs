//! Query abstract syntax tree.
//!
//! Represents parsed query expressions. The AST is also the persisted form of
//! a stored query: it serializes to JSON and is re-executed verbatim during
//! verification, independent of whatever was extracted from it for candidate
//! selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric literal in a query.
///
/// Integers and floats are kept apart so that integer endpoints survive
/// round-trips exactly; the schema layer decides how a number is normalized
/// for a given field type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// An integer literal (no decimal point or exponent).
    Int(i64),
    /// A floating-point literal.
    Float(f64),
}

impl Number {
    /// Returns the value as an `f64`, converting integers.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryExpr {
    /// The field must contain this term.
    Term {
        /// Field name.
        field: String,
        /// Term value (tokenized for text fields, verbatim for keyword fields).
        value: String,
    },

    /// A numeric field value must fall within an inclusive range.
    Range {
        /// Field name.
        field: String,
        /// Lower endpoint (inclusive).
        lo: Number,
        /// Upper endpoint (inclusive).
        hi: Number,
    },

    /// A geo-point field value must lie within `meters` of a center point.
    GeoDistance {
        /// Field name.
        field: String,
        /// Center latitude in degrees.
        lat: f64,
        /// Center longitude in degrees.
        lon: f64,
        /// Radius in meters.
        meters: f64,
    },

    /// Conjunction: all sub-expressions must match.
    And(Vec<Self>),

    /// Disjunction: at least one sub-expression must match.
    Or(Vec<Self>),
}

impl QueryExpr {
    /// Creates an And expression, flattening nested Ands.
    pub fn and(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::And(flattened),
        }
    }

    /// Creates an Or expression, flattening nested Ors.
    pub fn or(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::Or(flattened),
        }
    }

    /// Creates a term expression.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an integer range expression.
    pub fn int_range(field: impl Into<String>, lo: i64, hi: i64) -> Self {
        Self::Range {
            field: field.into(),
            lo: Number::Int(lo),
            hi: Number::Int(hi),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term { field, value } => writeln!(f, "{prefix}Term({field}:{value:?})"),
            Self::Range { field, lo, hi } => writeln!(f, "{prefix}Range({field}:[{lo} TO {hi}])"),
            Self::GeoDistance {
                field,
                lat,
                lon,
                meters,
            } => writeln!(f, "{prefix}GeoDistance({field}: {lat},{lon} r={meters}m)"),
            Self::And(exprs) => {
                writeln!(f, "{prefix}And")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(exprs) => {
                writeln!(f, "{prefix}Or")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_nested() {
        let expr = QueryExpr::and(vec![
            QueryExpr::and(vec![QueryExpr::term("a", "x"), QueryExpr::term("b", "y")]),
            QueryExpr::term("c", "z"),
        ]);
        assert_eq!(
            expr,
            QueryExpr::And(vec![
                QueryExpr::term("a", "x"),
                QueryExpr::term("b", "y"),
                QueryExpr::term("c", "z"),
            ])
        );
    }

    #[test]
    fn and_of_one_collapses() {
        let expr = QueryExpr::and(vec![QueryExpr::term("a", "x")]);
        assert_eq!(expr, QueryExpr::term("a", "x"));
    }

    #[test]
    fn or_flattens_nested() {
        let expr = QueryExpr::or(vec![
            QueryExpr::term("a", "x"),
            QueryExpr::or(vec![QueryExpr::term("b", "y"), QueryExpr::term("c", "z")]),
        ]);
        assert_eq!(
            expr,
            QueryExpr::Or(vec![
                QueryExpr::term("a", "x"),
                QueryExpr::term("b", "y"),
                QueryExpr::term("c", "z"),
            ])
        );
    }

    #[test]
    fn serde_round_trip() {
        let expr = QueryExpr::or(vec![
            QueryExpr::int_range("int_field", 0, 5),
            QueryExpr::GeoDistance {
                field: "location".to_string(),
                lat: 6.927079,
                lon: 79.861244,
                meters: 30000.0,
            },
        ]);
        let json = serde_json::to_string(&expr).unwrap();
        let back: QueryExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, back);
    }

    #[test]
    fn integer_endpoints_survive_serialization() {
        let expr = QueryExpr::int_range("big", i64::MAX - 1, i64::MAX);
        let json = serde_json::to_string(&expr).unwrap();
        let back: QueryExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, back);
    }

    #[test]
    fn display_shows_tree() {
        let expr = QueryExpr::And(vec![
            QueryExpr::term("greeting", "hi"),
            QueryExpr::int_range("int_field", 1, 10),
        ]);
        let text = expr.to_string();
        assert!(text.contains("And"));
        assert!(text.contains("Term(greeting:\"hi\")"));
        assert!(text.contains("Range(int_field:[1 TO 10])"));
    }
}
