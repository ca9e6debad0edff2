//! Writer for the stored-query index.
//!
//! Writes are append-only: a stored query is never mutated in place, an
//! update is a delete followed by a re-add. Readers holding a searcher
//! snapshot are unaffected until they reload.

use std::{fs, path::Path};

use perq_query::QueryExpr;
use perq_schema::Schema;
use tantivy::{
    Index, IndexWriter as TantivyIndexWriter, TantivyDocument, Term, directory::MmapDirectory,
    tokenizer::TextAnalyzer,
};

use crate::{
    analyzer::build_analyzer,
    error::PercolateError,
    extract::{Extraction, ExtractedClause, extract},
    schema::{EXTRACTION_COMPLETE, EXTRACTION_FAILED, QuerySchema},
    schema_hash::check_manifest,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Writes stored queries to the extraction index.
pub struct QueryWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Extraction-index schema with field handles.
    schema: QuerySchema,
    /// Document field schema driving extraction.
    doc_schema: Schema,
    /// Analyzer used to tokenize term values during extraction.
    analyzer: TextAnalyzer,
}

impl std::fmt::Debug for QueryWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryWriter")
            .field("doc_schema", &self.doc_schema)
            .finish_non_exhaustive()
    }
}

impl QueryWriter {
    /// Opens or creates a stored-query index at the given path.
    ///
    /// A new index records a fingerprint of the field schema; reopening with
    /// a different schema is refused.
    pub fn open(path: &Path, fields: &Schema) -> Result<Self, PercolateError> {
        fs::create_dir_all(path)?;
        check_manifest(path, fields)?;

        let schema = QuerySchema::for_fields(fields);

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            PercolateError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| PercolateError::open_index(path.to_path_buf(), &e))?;

        let writer = index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| PercolateError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            index,
            writer,
            schema,
            doc_schema: fields.clone(),
            analyzer: build_analyzer(),
        })
    }

    /// Adds a stored query under the given identifier.
    ///
    /// The query is analyzed for extractable clauses, written together with
    /// its serialized payload, and staged until [`Self::commit`] is called.
    pub fn add_query(&mut self, id: &str, expr: &QueryExpr) -> Result<(), PercolateError> {
        let payload =
            serde_json::to_string(expr).map_err(|e| PercolateError::Write(e.to_string()))?;

        let mut doc = TantivyDocument::new();
        doc.add_text(self.schema.query_id, id);
        doc.add_text(self.schema.query, &payload);

        match extract(&self.doc_schema, &mut self.analyzer, expr) {
            Extraction::Clauses(clauses) => {
                doc.add_text(self.schema.extraction_status, EXTRACTION_COMPLETE);
                for clause in clauses {
                    match clause {
                        ExtractedClause::Term { field, token } => {
                            doc.add_text(
                                self.schema.extracted_terms,
                                QuerySchema::encode_term(&field, &token),
                            );
                        }
                        ExtractedClause::Range {
                            field,
                            min_key,
                            max_key,
                        } => {
                            if let Some((min, max)) = self.schema.range_fields(&field) {
                                doc.add_i64(min, min_key);
                                doc.add_i64(max, max_key);
                            }
                        }
                    }
                }
            }
            Extraction::Failed => {
                doc.add_text(self.schema.extraction_status, EXTRACTION_FAILED);
            }
        }

        self.writer
            .add_document(doc)
            .map_err(|e| PercolateError::write(&e))?;
        Ok(())
    }

    /// Deletes the stored query with the given identifier.
    pub fn delete_query(&mut self, id: &str) {
        let term = Term::from_field_text(self.schema.query_id, id);
        self.writer.delete_term(term);
    }

    /// Commits all pending changes, making them visible to new readers.
    pub fn commit(&mut self) -> Result<(), PercolateError> {
        self.writer
            .commit()
            .map_err(|e| PercolateError::commit(&e))?;
        Ok(())
    }

    /// Rolls back any uncommitted changes.
    pub fn rollback(&mut self) -> Result<(), PercolateError> {
        self.writer
            .rollback()
            .map_err(|e| PercolateError::commit(&e))?;
        Ok(())
    }

    /// Returns the underlying index.
    pub(crate) fn index(&self) -> &Index {
        &self.index
    }

    /// Returns the extraction-index schema.
    pub(crate) fn schema(&self) -> &QuerySchema {
        &self.schema
    }

    /// Returns the number of committed stored queries.
    pub fn num_queries(&self) -> Result<u64, PercolateError> {
        let reader = self
            .index
            .reader()
            .map_err(|e| PercolateError::Search(e.to_string()))?;
        Ok(reader.searcher().num_docs())
    }
}
