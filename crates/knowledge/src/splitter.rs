//! Recursive character splitting of page documents into chunks.

use crate::types::Document;
use pdfrag_core::config::ChunkingSettings;
use pdfrag_core::{AppError, AppResult};
use text_splitter::{ChunkConfig, TextSplitter};

/// Splits documents into chunks of at most `chunk_size` characters,
/// consecutive chunks sharing up to `chunk_overlap` characters.
///
/// Boundaries are chosen from the largest semantic unit that fits:
/// paragraphs, then lines, sentences, words and finally characters.
pub struct RecursiveSplitter {
    splitter: TextSplitter<text_splitter::Characters>,
    chunk_size: usize,
}

impl RecursiveSplitter {
    /// Create a splitter; the overlap must be smaller than the size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| AppError::Config(format!("Invalid chunking settings: {}", e)))?;

        Ok(Self {
            splitter: TextSplitter::new(config),
            chunk_size,
        })
    }

    /// Create a splitter from configured chunking settings.
    pub fn from_settings(settings: &ChunkingSettings) -> AppResult<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }

    /// Split every document, in order. Each chunk inherits a copy of its
    /// page's metadata; whitespace-only chunks are dropped.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let chunks: Vec<Document> = documents
            .iter()
            .flat_map(|doc| {
                self.splitter
                    .chunks(&doc.page_content)
                    .filter(|chunk| !chunk.trim().is_empty())
                    .map(|chunk| Document {
                        page_content: chunk.to_string(),
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect();

        tracing::debug!(
            "Split {} documents into {} chunks (size: {})",
            documents.len(),
            chunks.len(),
            self.chunk_size
        );

        chunks
    }
}
