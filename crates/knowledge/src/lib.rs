//! PDF question answering over a vector store.
//!
//! Two linear pipelines:
//! - Ingestion: load PDF pages → split into chunks → embed → store
//! - Query: embed question → retrieve similar chunks → generate answer

pub mod embeddings;
pub mod ingest;
pub mod loader;
pub mod metadata;
pub mod search;
pub mod splitter;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use ingest::{ingest_from_config, ingest_pdf};
pub use search::{build_context, RagEngine};
pub use store::{open_store, VectorStore};
pub use types::{CollectionStats, Document, IngestOutcome, IngestStats, StoredChunk};

use pdfrag_core::{AppConfig, AppResult};

/// Count the chunks stored in the configured collection.
pub async fn collection_stats(config: &AppConfig) -> AppResult<CollectionStats> {
    let store = open_store(
        config.require_vector_store_url()?,
        config.require_collection()?,
    )
    .await?;

    Ok(CollectionStats {
        collection: store.collection().to_string(),
        backend: store.backend_name().to_string(),
        chunks: store.count().await?,
    })
}

/// Drop the configured collection and its chunks.
pub async fn clean_collection(config: &AppConfig) -> AppResult<()> {
    let store = open_store(
        config.require_vector_store_url()?,
        config.require_collection()?,
    )
    .await?;

    store.drop_collection().await
}
