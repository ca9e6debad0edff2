//! Index schema for the stored-query (extraction) index.
//!
//! Each stored query becomes one document:
//! - `query_id`: unique stored-query identifier (raw string, stored)
//! - `query`: the original query serialized as JSON (stored only) - the
//!   verification payload, re-executed verbatim against the incoming document
//! - `extracted_terms`: one raw posting per extracted (field, token) pair,
//!   encoded as `field NUL token`
//! - `extraction_status`: `complete` or `failed`; the `failed` marker is what
//!   keeps unextractable queries selectable by a single clause
//! - `{field}.min` / `{field}.max`: per numeric schema field, the encoded
//!   endpoints of extracted ranges (i64 ordered keys)

use std::collections::BTreeMap;

use tantivy::schema::{
    FAST, Field, INDEXED, STORED, STRING, Schema as TantivySchema,
};

/// `extraction_status` value for fully extracted queries.
pub const EXTRACTION_COMPLETE: &str = "complete";

/// `extraction_status` value for queries kept as verify-only candidates.
pub const EXTRACTION_FAILED: &str = "failed";

/// Separator between field name and token in `extracted_terms` postings.
const TERM_SEPARATOR: char = '\0';

/// Handles to all fields in the stored-query index schema.
#[derive(Debug, Clone)]
pub struct QuerySchema {
    /// The underlying Tantivy schema.
    schema: TantivySchema,
    /// Unique stored-query identifier.
    pub query_id: Field,
    /// Serialized original query (the verification payload).
    pub query: Field,
    /// Extracted (field, token) postings.
    pub extracted_terms: Field,
    /// Extraction outcome marker.
    pub extraction_status: Field,
    /// Per numeric document field: (min, max) endpoint fields.
    ranges: BTreeMap<String, (Field, Field)>,
}

impl QuerySchema {
    /// Builds the stored-query index schema for a document field schema.
    ///
    /// The layout depends on the document schema (one endpoint field pair per
    /// numeric field), which is why an index must be rebuilt when the schema
    /// changes.
    pub fn for_fields(fields: &perq_schema::Schema) -> Self {
        let mut builder = TantivySchema::builder();

        let query_id = builder.add_text_field("query_id", STRING | STORED);
        let query = builder.add_text_field("query", STORED);
        let extracted_terms = builder.add_text_field("extracted_terms", STRING);
        let extraction_status = builder.add_text_field("extraction_status", STRING | STORED);

        let mut ranges = BTreeMap::new();
        for name in fields.numeric_fields() {
            let min = builder.add_i64_field(&format!("{name}.min"), INDEXED | FAST);
            let max = builder.add_i64_field(&format!("{name}.max"), INDEXED | FAST);
            ranges.insert(name.to_string(), (min, max));
        }

        let schema = builder.build();

        Self {
            schema,
            query_id,
            query,
            extracted_terms,
            extraction_status,
            ranges,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &TantivySchema {
        &self.schema
    }

    /// Returns the (min, max) endpoint fields for a numeric document field.
    pub fn range_fields(&self, field: &str) -> Option<(Field, Field)> {
        self.ranges.get(field).copied()
    }

    /// Encodes a (field, token) pair into an `extracted_terms` posting.
    pub fn encode_term(field: &str, token: &str) -> String {
        format!("{field}{TERM_SEPARATOR}{token}")
    }
}

#[cfg(test)]
mod test {
    use perq_schema::FieldType;
    use tantivy::schema::FieldType as TantivyFieldType;

    use super::*;

    fn doc_schema() -> perq_schema::Schema {
        perq_schema::Schema::new([
            ("greeting".to_string(), FieldType::Text),
            ("int_field".to_string(), FieldType::Integer),
            ("location".to_string(), FieldType::GeoPoint),
        ])
    }

    #[test]
    fn schema_has_core_fields() {
        let schema = QuerySchema::for_fields(&doc_schema());
        let tantivy_schema = schema.schema();

        assert!(tantivy_schema.get_field("query_id").is_ok());
        assert!(tantivy_schema.get_field("query").is_ok());
        assert!(tantivy_schema.get_field("extracted_terms").is_ok());
        assert!(tantivy_schema.get_field("extraction_status").is_ok());
    }

    #[test]
    fn numeric_fields_get_endpoint_pairs() {
        let schema = QuerySchema::for_fields(&doc_schema());

        assert!(schema.range_fields("int_field").is_some());
        assert!(schema.schema().get_field("int_field.min").is_ok());
        assert!(schema.schema().get_field("int_field.max").is_ok());

        // Non-numeric fields get none.
        assert!(schema.range_fields("greeting").is_none());
        assert!(schema.range_fields("location").is_none());
    }

    #[test]
    fn query_id_is_raw_and_stored() {
        let schema = QuerySchema::for_fields(&doc_schema());
        let entry = schema.schema().get_field_entry(schema.query_id);

        assert!(entry.is_indexed());
        assert!(entry.is_stored());
        if let TantivyFieldType::Str(opts) = entry.field_type() {
            assert_eq!(opts.get_indexing_options().unwrap().tokenizer(), "raw");
        } else {
            panic!("query_id should be a text field");
        }
    }

    #[test]
    fn query_payload_is_stored_only() {
        let schema = QuerySchema::for_fields(&doc_schema());
        let entry = schema.schema().get_field_entry(schema.query);

        assert!(entry.is_stored());
        assert!(!entry.is_indexed());
    }

    #[test]
    fn endpoint_fields_are_indexed_i64() {
        let schema = QuerySchema::for_fields(&doc_schema());
        let (min, max) = schema.range_fields("int_field").unwrap();

        for field in [min, max] {
            let entry = schema.schema().get_field_entry(field);
            assert!(entry.is_indexed());
            assert!(entry.is_fast());
            assert!(matches!(entry.field_type(), TantivyFieldType::I64(_)));
        }
    }

    #[test]
    fn term_encoding_separates_field_and_token() {
        assert_eq!(
            QuerySchema::encode_term("greeting", "happy"),
            "greeting\0happy"
        );
        // Distinct fields with equal tokens never collide.
        assert_ne!(
            QuerySchema::encode_term("a", "x"),
            QuerySchema::encode_term("b", "x")
        );
    }
}
