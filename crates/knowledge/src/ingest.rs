//! Ingestion pipeline: load → split → embed/store.

use crate::embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
use crate::loader::load_pdf;
use crate::metadata::clean_metadata;
use crate::splitter::RecursiveSplitter;
use crate::store::{open_store, VectorStore};
use crate::types::{Document, IngestOutcome, IngestStats, StoredChunk};
use pdfrag_core::config::ChunkingSettings;
use pdfrag_core::{AppConfig, AppError, AppResult};
use std::path::Path;
use std::time::Instant;

/// Ingest the configured PDF into the configured collection.
///
/// Builds the embedding provider and opens the vector store from
/// `config`, then runs [`ingest_pdf`].
pub async fn ingest_from_config(config: &AppConfig) -> AppResult<IngestOutcome> {
    let embedder = create_provider(&EmbeddingConfig::from_app_config(config))?;
    let store = open_store(
        config.require_vector_store_url()?,
        config.require_collection()?,
    )
    .await?;

    ingest_pdf(
        &config.pdf_path,
        &config.chunking,
        embedder.as_ref(),
        store.as_ref(),
    )
    .await
}

/// Load, split, embed and store one PDF.
///
/// Every chunk is embedded first; only then is the collection emptied and
/// the new chunks written, so a failed embedding run leaves the previous
/// contents in place. Chunk ids are `doc-<n>` in document order. Nothing
/// is written when splitting yields no chunks.
pub async fn ingest_pdf(
    pdf_path: &Path,
    chunking: &ChunkingSettings,
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
) -> AppResult<IngestOutcome> {
    let started = Instant::now();

    tracing::info!("Reading and splitting {:?}", pdf_path);
    let pages = load_pages(pdf_path).await?;
    let splitter = RecursiveSplitter::from_settings(chunking)?;
    let splits = splitter.split_documents(&pages);

    if splits.is_empty() {
        tracing::warn!("No text chunks found in {:?}; nothing to process", pdf_path);
        return Ok(IngestOutcome::Empty { pages: pages.len() });
    }

    tracing::info!(
        "Split {} pages into {} chunks",
        pages.len(),
        splits.len()
    );

    let documents: Vec<Document> = splits
        .into_iter()
        .map(|doc| Document {
            metadata: clean_metadata(&doc.metadata),
            page_content: doc.page_content,
        })
        .collect();

    tracing::info!(
        "Embedding {} chunks with {} ({})",
        documents.len(),
        embedder.provider_name(),
        embedder.model_name()
    );
    let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    if embeddings.len() != documents.len() {
        return Err(AppError::Embedding(format!(
            "Expected {} embeddings, got {}",
            documents.len(),
            embeddings.len()
        )));
    }

    store.reset_collection().await?;

    let chunks: Vec<StoredChunk> = documents
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (document, embedding))| StoredChunk {
            id: format!("doc-{}", i),
            document,
            embedding,
        })
        .collect();

    tracing::info!(
        "Writing {} chunks to collection '{}' ({})",
        chunks.len(),
        store.collection(),
        store.backend_name()
    );
    store.add_documents(&chunks).await?;

    let stats = IngestStats {
        pdf_path: pdf_path.to_path_buf(),
        collection: store.collection().to_string(),
        pages: pages.len(),
        chunks: chunks.len(),
        duration_secs: started.elapsed().as_secs_f64(),
    };

    tracing::info!(
        "Ingestion complete: {} chunks in {:.2}s",
        stats.chunks,
        stats.duration_secs
    );

    Ok(IngestOutcome::Stored(stats))
}

/// Run the blocking PDF parser on the blocking thread pool.
async fn load_pages(pdf_path: &Path) -> AppResult<Vec<Document>> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || load_pdf(&path))
        .await
        .map_err(|e| AppError::Document(format!("PDF loading task failed: {}", e)))?
}
