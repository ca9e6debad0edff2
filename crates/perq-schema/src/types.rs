//! Field type tags and the field schema.
//!
//! A [`Schema`] maps field names to [`FieldType`] tags. The tag decides which
//! extraction strategy applies to a query clause over that field and how the
//! field is represented in both the persistent stored-query index and the
//! transient single-document index.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The type of a document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Tokenized text.
    Text,
    /// Single-token exact string.
    Keyword,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// Half-precision float.
    HalfFloat,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// IPv4 or IPv6 address.
    Ip,
    /// Latitude/longitude point.
    GeoPoint,
}

impl FieldType {
    /// Returns true for types whose range clauses are extractable into
    /// ordered numeric keys.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Long | Self::HalfFloat | Self::Float | Self::Double
        )
    }

    /// The canonical tag name, as written in `perq.toml`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::HalfFloat => "half_float",
            Self::Float => "float",
            Self::Double => "double",
            Self::Ip => "ip",
            Self::GeoPoint => "geo_point",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "keyword" => Ok(Self::Keyword),
            "integer" => Ok(Self::Integer),
            "long" => Ok(Self::Long),
            "half_float" => Ok(Self::HalfFloat),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "ip" => Ok(Self::Ip),
            "geo_point" => Ok(Self::GeoPoint),
            other => Err(format!("unknown field type: {other}")),
        }
    }
}

/// The field schema: an ordered map from field name to type tag.
///
/// The schema is declarative input. It is fixed for the lifetime of a
/// stored-query index; changing it requires rebuilding the index (enforced
/// via a schema fingerprint stored beside the index).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// Field name to type tag, in name order.
    fields: BTreeMap<String, FieldType>,
}

impl Schema {
    /// Creates a schema from (name, type) pairs.
    pub fn new(fields: impl IntoIterator<Item = (String, FieldType)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Looks up the type of a field.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Iterates over numeric fields in name order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, ty)| ty.is_numeric())
            .map(|(name, _)| name)
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
