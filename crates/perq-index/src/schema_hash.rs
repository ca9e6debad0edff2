//! Schema fingerprinting for the stored-query index.
//!
//! The stored-query index layout depends on the document field schema (one
//! endpoint field pair per numeric field, extraction strategy per type tag).
//! A fingerprint of the schema is stored in a small manifest beside the index
//! and compared on every open: a mismatch means the index must be rebuilt,
//! not silently reinterpreted.

use std::{
    fs,
    hash::{Hash, Hasher},
    io,
    path::Path,
};

use perq_schema::Schema;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;

use crate::error::PercolateError;

/// Current index layout version. Bump when field definitions change.
pub const SCHEMA_VERSION: u32 = 1;

/// Manifest file name, stored inside the index directory.
pub(crate) const MANIFEST_FILENAME: &str = "percolator.json";

/// Computes the fingerprint of a field schema as a hex string.
pub fn schema_fingerprint(schema: &Schema) -> String {
    let mut hasher = SipHasher24::new();
    SCHEMA_VERSION.hash(&mut hasher);
    for (name, ty) in schema.iter() {
        name.hash(&mut hasher);
        ty.name().hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

/// The on-disk manifest beside a stored-query index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Fingerprint of the field schema the index was built with.
    pub schema_hash: String,
}

impl Manifest {
    /// Creates a manifest for the given schema.
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            schema_hash: schema_fingerprint(schema),
        }
    }

    /// Loads the manifest from an index directory, if present.
    pub fn load(index_dir: &Path) -> Result<Option<Self>, PercolateError> {
        let path = index_dir.join(MANIFEST_FILENAME);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let manifest = serde_json::from_str(&contents).map_err(|e| {
            PercolateError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to parse index manifest: {e}"),
            ))
        })?;
        Ok(Some(manifest))
    }

    /// Saves the manifest into an index directory.
    pub fn save(&self, index_dir: &Path) -> Result<(), PercolateError> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PercolateError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize index manifest: {e}"),
            ))
        })?;
        fs::write(index_dir.join(MANIFEST_FILENAME), contents)?;
        Ok(())
    }
}

/// Verifies (or writes, on first use) the manifest for an index directory.
pub fn check_manifest(index_dir: &Path, schema: &Schema) -> Result<(), PercolateError> {
    match Manifest::load(index_dir)? {
        Some(manifest) if manifest.schema_hash == schema_fingerprint(schema) => Ok(()),
        Some(_) => Err(PercolateError::SchemaMismatch {
            path: index_dir.to_path_buf(),
        }),
        None => Manifest::for_schema(schema).save(index_dir),
    }
}
