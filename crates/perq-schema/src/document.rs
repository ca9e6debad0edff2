//! The incoming document of a percolate call.
//!
//! A [`Document`] is ephemeral: it is built from a JSON object at the start of
//! a percolate call, read by candidate selection and verification, and dropped
//! when the call returns. It is never persisted.
//!
//! Conversion is strict. A field the schema does not declare, or a value that
//! does not fit the declared type, fails the whole conversion: the document is
//! the single unit of work and a silently dropped field would silently change
//! the match result.

use std::{collections::BTreeMap, net::IpAddr};

use serde_json::Value as JsonValue;

use crate::{
    error::DocumentError,
    types::{FieldType, Schema},
};

/// A typed value of one document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Tokenized text.
    Text(String),
    /// Exact single-token string.
    Keyword(String),
    /// Integer value (integer and long fields).
    Integer(i64),
    /// Floating value (half_float, float, and double fields).
    Float(f64),
    /// IP address.
    Ip(IpAddr),
    /// Latitude/longitude point.
    Point {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
}

/// An incoming document: field name to typed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Field values keyed by field name, in name order.
    fields: BTreeMap<String, Vec<FieldValue>>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to a field.
    pub fn add(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.entry(field.into()).or_default().push(value);
    }

    /// Builds a document from a JSON object, validated against the schema.
    pub fn from_json(schema: &Schema, json: &JsonValue) -> Result<Self, DocumentError> {
        let object = json.as_object().ok_or(DocumentError::NotAnObject)?;

        let mut doc = Self::new();
        for (field, raw) in object {
            let Some(ty) = schema.field_type(field) else {
                return Err(DocumentError::UndeclaredField {
                    field: field.clone(),
                });
            };

            // A JSON array means multiple values for the field.
            match raw {
                JsonValue::Array(items) => {
                    for item in items {
                        doc.add(field, convert_value(field, ty, item)?);
                    }
                }
                single => doc.add(field, convert_value(field, ty, single)?),
            }
        }

        Ok(doc)
    }

    /// Returns the values of a field, empty if absent.
    pub fn get(&self, field: &str) -> &[FieldValue] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldValue])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Converts one JSON scalar into a typed field value.
fn convert_value(
    field: &str,
    ty: FieldType,
    raw: &JsonValue,
) -> Result<FieldValue, DocumentError> {
    match ty {
        FieldType::Text => match raw.as_str() {
            Some(s) => Ok(FieldValue::Text(s.to_string())),
            None => Err(DocumentError::invalid(field, "expected a string")),
        },
        FieldType::Keyword => match raw.as_str() {
            Some(s) => Ok(FieldValue::Keyword(s.to_string())),
            None => Err(DocumentError::invalid(field, "expected a string")),
        },
        FieldType::Integer | FieldType::Long => match raw.as_i64() {
            Some(v) => Ok(FieldValue::Integer(v)),
            None => Err(DocumentError::invalid(field, "expected an integer")),
        },
        FieldType::HalfFloat | FieldType::Float | FieldType::Double => match raw.as_f64() {
            Some(v) if v.is_finite() => Ok(FieldValue::Float(v)),
            Some(_) => Err(DocumentError::invalid(field, "expected a finite number")),
            None => Err(DocumentError::invalid(field, "expected a number")),
        },
        FieldType::Ip => match raw.as_str() {
            Some(s) => s
                .parse::<IpAddr>()
                .map(FieldValue::Ip)
                .map_err(|e| DocumentError::invalid(field, format!("bad ip address: {e}"))),
            None => Err(DocumentError::invalid(field, "expected an ip string")),
        },
        FieldType::GeoPoint => {
            let object = raw
                .as_object()
                .ok_or_else(|| DocumentError::invalid(field, "expected {lat, lon}"))?;
            let lat = object
                .get("lat")
                .and_then(JsonValue::as_f64)
                .ok_or_else(|| DocumentError::invalid(field, "missing numeric lat"))?;
            let lon = object
                .get("lon")
                .and_then(JsonValue::as_f64)
                .ok_or_else(|| DocumentError::invalid(field, "missing numeric lon"))?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(DocumentError::invalid(field, "lat/lon out of range"));
            }
            Ok(FieldValue::Point { lat, lon })
        }
    }
}
