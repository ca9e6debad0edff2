//! The transient single-document index.
//!
//! Verification re-executes original stored queries against an in-RAM index
//! holding exactly one document: the incoming one. The index is built once
//! per percolate call and reused for every surviving candidate; rebuilding it
//! per candidate would be correct but wasteful.
//!
//! Field typing mirrors the persistent schema: text fields go through the
//! shared analyzer, keyword and ip fields are raw single tokens, and numeric
//! fields hold the same ordered i64 keys used by extraction, so a range check
//! here agrees exactly with the keys the selector probed. Geo points are not
//! indexed at all; geo predicates are evaluated directly against the document.

use std::collections::HashMap;

use perq_query::Number;
use perq_schema::{Document, FieldType, Schema, encode};
use tantivy::{
    Index, Searcher, TantivyDocument,
    schema::{
        FAST, Field, INDEXED, IndexRecordOption, STRING, Schema as TantivySchema,
        TextFieldIndexing, TextOptions,
    },
};

use crate::{
    analyzer::{PERQ_TOKENIZER, build_analyzer},
    error::PercolateError,
};

/// Writer heap for the single-document RAM index.
const RAM_WRITER_HEAP: usize = 15_000_000;

/// A one-document in-RAM index for verification.
pub struct DocumentIndex {
    /// Searcher over the single committed document.
    searcher: Searcher,
    /// Tantivy field handles keyed by document field name.
    fields: HashMap<String, Field>,
    /// The document field schema.
    doc_schema: Schema,
}

impl DocumentIndex {
    /// Builds the transient index from an incoming document.
    pub fn build(schema: &Schema, document: &Document) -> Result<Self, PercolateError> {
        let mut builder = TantivySchema::builder();
        let mut fields = HashMap::new();

        for (name, ty) in schema.iter() {
            let field = match ty {
                FieldType::Text => {
                    let options = TextOptions::default().set_indexing_options(
                        TextFieldIndexing::default()
                            .set_tokenizer(PERQ_TOKENIZER)
                            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
                    );
                    builder.add_text_field(name, options)
                }
                FieldType::Keyword | FieldType::Ip => builder.add_text_field(name, STRING),
                ty if ty.is_numeric() => builder.add_i64_field(name, INDEXED | FAST),
                // Geo points are verified against the document directly.
                _ => continue,
            };
            fields.insert(name.to_string(), field);
        }

        let index = Index::create_in_ram(builder.build());
        index
            .tokenizers()
            .register(PERQ_TOKENIZER, build_analyzer());

        let mut doc = TantivyDocument::new();
        for (name, values) in document.iter() {
            let Some(&field) = fields.get(name) else {
                continue; // geo point field
            };
            let Some(ty) = schema.field_type(name) else {
                continue;
            };
            for value in values {
                add_value(&mut doc, field, ty, value);
            }
        }

        let mut writer = index
            .writer(RAM_WRITER_HEAP)
            .map_err(|e| PercolateError::write(&e))?;
        writer.add_document(doc).map_err(|e| PercolateError::write(&e))?;
        writer.commit().map_err(|e| PercolateError::commit(&e))?;

        let reader = index
            .reader()
            .map_err(|e| PercolateError::Search(e.to_string()))?;
        let searcher = reader.searcher();

        Ok(Self {
            searcher,
            fields,
            doc_schema: schema.clone(),
        })
    }

    /// Returns the searcher over the single document.
    pub(crate) fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Looks up the tantivy field for a document field name.
    pub(crate) fn field(&self, name: &str) -> Option<Field> {
        self.fields.get(name).copied()
    }

    /// Looks up the declared type of a document field.
    pub(crate) fn field_type(&self, name: &str) -> Option<FieldType> {
        self.doc_schema.field_type(name)
    }
}

/// Adds one typed value to the tantivy document.
fn add_value(
    doc: &mut TantivyDocument,
    field: Field,
    ty: FieldType,
    value: &perq_schema::FieldValue,
) {
    use perq_schema::FieldValue;

    match value {
        FieldValue::Text(s) | FieldValue::Keyword(s) => doc.add_text(field, s),
        FieldValue::Ip(addr) => doc.add_text(field, addr.to_string()),
        FieldValue::Integer(v) => {
            if let Some(key) = encode::value_key(ty, Number::Int(*v)) {
                doc.add_i64(field, key);
            }
        }
        FieldValue::Float(v) => {
            if let Some(key) = encode::value_key(ty, Number::Float(*v)) {
                doc.add_i64(field, key);
            }
        }
        FieldValue::Point { .. } => {}
    }
}

#[cfg(test)]
mod test {
    use perq_schema::FieldValue;
    use tantivy::{collector::Count, query::TermQuery, schema::IndexRecordOption};

    use super::*;

    fn doc_schema() -> Schema {
        Schema::new([
            ("greeting".to_string(), FieldType::Text),
            ("int_field".to_string(), FieldType::Integer),
            ("location".to_string(), FieldType::GeoPoint),
        ])
    }

    #[test]
    fn indexes_exactly_one_document() {
        let mut document = Document::new();
        document.add("greeting", FieldValue::Text("happy holidays".to_string()));
        let index = DocumentIndex::build(&doc_schema(), &document).unwrap();
        assert_eq!(index.searcher().num_docs(), 1);
    }

    #[test]
    fn text_tokens_are_searchable() {
        let mut document = Document::new();
        document.add("greeting", FieldValue::Text("Happy Holidays".to_string()));
        let index = DocumentIndex::build(&doc_schema(), &document).unwrap();

        let field = index.field("greeting").unwrap();
        let query = TermQuery::new(
            tantivy::Term::from_field_text(field, "happy"),
            IndexRecordOption::Basic,
        );
        let count = index.searcher().search(&query, &Count).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn numeric_values_use_ordered_keys() {
        let mut document = Document::new();
        document.add("int_field", FieldValue::Integer(3));
        let index = DocumentIndex::build(&doc_schema(), &document).unwrap();

        let field = index.field("int_field").unwrap();
        let query = TermQuery::new(
            tantivy::Term::from_field_i64(field, 3),
            IndexRecordOption::Basic,
        );
        let count = index.searcher().search(&query, &Count).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn geo_fields_are_not_indexed() {
        let mut document = Document::new();
        document.add(
            "location",
            FieldValue::Point {
                lat: 6.8,
                lon: 79.9,
            },
        );
        let index = DocumentIndex::build(&doc_schema(), &document).unwrap();
        assert!(index.field("location").is_none());
        assert_eq!(index.searcher().num_docs(), 1);
    }

    #[test]
    fn empty_document_still_builds() {
        let index = DocumentIndex::build(&doc_schema(), &Document::new()).unwrap();
        assert_eq!(index.searcher().num_docs(), 1);
    }
}
