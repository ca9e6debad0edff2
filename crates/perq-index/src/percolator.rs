//! Read-side percolation: select, verify, finalize.

use std::path::Path;

use perq_schema::{Document, Schema};
use serde::Serialize;
use tantivy::{Index, IndexReader, ReloadPolicy, directory::MmapDirectory, tokenizer::TextAnalyzer};

use crate::{
    analyzer::build_analyzer,
    document::DocumentIndex,
    error::PercolateError,
    schema::QuerySchema,
    schema_hash::check_manifest,
    select::select_candidates,
    verify::verify,
};

/// A stored query as listed from the index.
#[derive(Debug, Clone, Serialize)]
pub struct StoredQuery {
    /// The stored query id.
    pub id: String,
    /// The serialized query payload.
    pub query: String,
    /// Extraction outcome (`complete` or `failed`).
    pub status: String,
}

/// One stored query matched by a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMatch {
    /// The stored query id.
    pub id: String,
    /// Relevance score from verification.
    pub score: f32,
}

/// Matches incoming documents against the stored queries in an index.
///
/// A percolator holds a reader snapshot: queries committed after it was
/// opened become visible only after [`Self::reload`]. A single call sees one
/// consistent snapshot throughout.
pub struct Percolator {
    /// Reader over the stored-query index.
    reader: IndexReader,
    /// Extraction-index schema with field handles.
    schema: QuerySchema,
    /// Document field schema.
    doc_schema: Schema,
    /// Analyzer shared by selection and verification.
    analyzer: TextAnalyzer,
}

impl std::fmt::Debug for Percolator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Percolator")
            .field("doc_schema", &self.doc_schema)
            .finish_non_exhaustive()
    }
}

impl Percolator {
    /// Opens an existing stored-query index for percolation.
    pub fn open(path: &Path, fields: &Schema) -> Result<Self, PercolateError> {
        if !path.is_dir() {
            return Err(PercolateError::OpenIndex {
                path: path.to_path_buf(),
                message: "index directory does not exist".to_string(),
            });
        }
        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            PercolateError::open_index(path.to_path_buf(), &err)
        })?;
        let index =
            Index::open(dir).map_err(|e| PercolateError::open_index(path.to_path_buf(), &e))?;
        check_manifest(path, fields)?;

        let schema = QuerySchema::for_fields(fields);

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| {
                PercolateError::open_index(path.to_path_buf(), &e)
            })?;

        Ok(Self {
            reader,
            schema,
            doc_schema: fields.clone(),
            analyzer: build_analyzer(),
        })
    }

    /// Advances the snapshot to the latest committed state.
    pub fn reload(&self) -> Result<(), PercolateError> {
        self.reader
            .reload()
            .map_err(|e| PercolateError::search(&e))
    }

    /// Returns the number of stored queries visible in the current snapshot.
    pub fn num_queries(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Finds all stored queries a document matches.
    ///
    /// Selection over-approximates against the extraction index, then every
    /// candidate is verified against a transient index holding only this
    /// document. Results are sorted by score descending, ties by id
    /// ascending.
    pub fn percolate(&mut self, document: &Document) -> Result<Vec<QueryMatch>, PercolateError> {
        let searcher = self.reader.searcher();
        let candidates = select_candidates(
            &searcher,
            &self.schema,
            &self.doc_schema,
            &mut self.analyzer,
            document,
        )?;
        tracing::debug!(candidates = candidates.len(), "selection complete");
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let doc_index = DocumentIndex::build(&self.doc_schema, document)?;
        let mut matches = Vec::new();
        for candidate in candidates {
            if let Some(score) =
                verify(&doc_index, document, &mut self.analyzer, &candidate.query)?
            {
                matches.push(QueryMatch {
                    id: candidate.id,
                    score,
                });
            }
        }

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matches)
    }

    /// Lists all stored queries in the current snapshot, sorted by id.
    pub fn list(&self) -> Result<Vec<StoredQuery>, PercolateError> {
        use tantivy::{TantivyDocument, collector::DocSetCollector, query::AllQuery, schema::Value};

        let searcher = self.reader.searcher();
        let addresses = searcher
            .search(&AllQuery, &DocSetCollector)
            .map_err(|e| PercolateError::search(&e))?;

        let mut queries = Vec::with_capacity(addresses.len());
        for address in addresses {
            let stored: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| PercolateError::search(&e))?;
            let field_str = |field| stored.get_first(field).and_then(|v| v.as_str());
            let (Some(id), Some(query), Some(status)) = (
                field_str(self.schema.query_id),
                field_str(self.schema.query),
                field_str(self.schema.extraction_status),
            ) else {
                continue;
            };
            queries.push(StoredQuery {
                id: id.to_string(),
                query: query.to_string(),
                status: status.to_string(),
            });
        }
        queries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(queries)
    }

    /// Parses a JSON document against the schema and percolates it.
    pub fn percolate_json(
        &mut self,
        json: &serde_json::Value,
    ) -> Result<Vec<QueryMatch>, PercolateError> {
        let document = Document::from_json(&self.doc_schema, json)?;
        self.percolate(&document)
    }
}
