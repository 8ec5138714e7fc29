//! Knowledge type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Free-form document metadata (`source`, `page`, PDF info fields, ...).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A unit of text with its metadata: a PDF page before splitting,
/// a chunk after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text content
    pub page_content: String,

    /// Metadata inherited from the source page
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Set one metadata entry.
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// A chunk ready to be written to a vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Identifier, unique within the collection (`doc-<n>`)
    pub id: String,

    /// Chunk text and metadata
    pub document: Document,

    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Ingested PDF
    pub pdf_path: PathBuf,

    /// Target collection
    pub collection: String,

    /// Pages read from the PDF
    pub pages: usize,

    /// Chunks embedded and stored
    pub chunks: usize,

    /// Wall-clock duration in seconds
    pub duration_secs: f64,
}

/// Result of an ingestion run.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The collection was replaced with the PDF's chunks.
    Stored(IngestStats),

    /// Splitting produced no chunks; nothing was written.
    Empty { pages: usize },
}

/// Statistics for a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Collection name
    pub collection: String,

    /// Vector store backend ("pgvector", "sqlite")
    pub backend: String,

    /// Number of stored chunks
    pub chunks: u64,
}
