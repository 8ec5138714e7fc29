//! PostgreSQL + pgvector vector store.
//!
//! Two tables hold every collection:
//! - `pdfrag_collections(name, created_at)`
//! - `pdfrag_embeddings(collection, id, document, metadata, embedding)`
//!
//! Similarity uses the cosine distance operator `<=>`; reported scores
//! are `1 - distance`.

use super::{redact_url, VectorStore};
use crate::types::{Document, Metadata, StoredChunk};
use ::pgvector::Vector;
use pdfrag_core::{AppError, AppResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;

const MAX_CONNECTIONS: u32 = 5;

/// Schema statements, executed one at a time.
const SCHEMA: [&str; 3] = [
    "CREATE EXTENSION IF NOT EXISTS vector",
    "CREATE TABLE IF NOT EXISTS pdfrag_collections (
        name TEXT PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS pdfrag_embeddings (
        collection TEXT NOT NULL REFERENCES pdfrag_collections(name) ON DELETE CASCADE,
        id TEXT NOT NULL,
        document TEXT NOT NULL,
        metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
        embedding vector NOT NULL,
        PRIMARY KEY (collection, id)
    )",
];

fn store_error(context: &str, err: sqlx::Error) -> AppError {
    AppError::Store(format!("{}: {}", context, err))
}

/// Vector store backed by PostgreSQL with the pgvector extension.
pub struct PgVectorStore {
    pool: PgPool,
    collection: String,
}

impl PgVectorStore {
    /// Connect to `url` and make sure the schema exists.
    pub async fn connect(url: &str, collection: &str) -> AppResult<Self> {
        tracing::debug!("Connecting to pgvector at {}", redact_url(url));

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await
            .map_err(|e| {
                AppError::Store(format!(
                    "Failed to connect to {}: {}",
                    redact_url(url),
                    e
                ))
            })?;

        let store = Self {
            pool,
            collection: collection.to_string(),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| store_error("Failed to create schema", e))?;
        }
        Ok(())
    }

    async fn ensure_collection<'e, E>(&self, executor: E) -> AppResult<()>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query("INSERT INTO pdfrag_collections (name) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(&self.collection)
            .execute(executor)
            .await
            .map_err(|e| store_error("Failed to create collection", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl VectorStore for PgVectorStore {
    fn backend_name(&self) -> &str {
        "pgvector"
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn reset_collection(&self) -> AppResult<()> {
        self.ensure_collection(&self.pool).await?;

        let deleted = sqlx::query("DELETE FROM pdfrag_embeddings WHERE collection = $1")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete chunks", e))?
            .rows_affected();

        tracing::debug!(
            "Reset collection '{}' ({} chunks removed)",
            self.collection,
            deleted
        );
        Ok(())
    }

    async fn add_documents(&self, chunks: &[StoredChunk]) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        self.ensure_collection(&mut *tx).await?;

        for chunk in chunks {
            sqlx::query(
                "INSERT INTO pdfrag_embeddings (collection, id, document, metadata, embedding)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (collection, id) DO UPDATE
                 SET document = EXCLUDED.document,
                     metadata = EXCLUDED.metadata,
                     embedding = EXCLUDED.embedding",
            )
            .bind(&self.collection)
            .bind(&chunk.id)
            .bind(&chunk.document.page_content)
            .bind(Json(&chunk.document.metadata))
            .bind(Vector::from(chunk.embedding.clone()))
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error(&format!("Failed to insert chunk {}", chunk.id), e))?;
        }

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit chunks", e))?;

        tracing::debug!(
            "Stored {} chunks in collection '{}'",
            chunks.len(),
            self.collection
        );
        Ok(())
    }

    async fn similarity_search_with_score(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> AppResult<Vec<(Document, f32)>> {
        let rows: Vec<(String, Json<Metadata>, f64)> = sqlx::query_as(
            "SELECT document, metadata, embedding <=> $1 AS distance
             FROM pdfrag_embeddings
             WHERE collection = $2
             ORDER BY distance, ctid
             LIMIT $3",
        )
        .bind(Vector::from(query_embedding.to_vec()))
        .bind(&self.collection)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to search chunks", e))?;

        tracing::debug!("Retrieved {} chunks (requested top-{})", rows.len(), k);

        Ok(rows
            .into_iter()
            .map(|(page_content, Json(metadata), distance)| {
                (
                    Document {
                        page_content,
                        metadata,
                    },
                    (1.0 - distance) as f32,
                )
            })
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pdfrag_embeddings WHERE collection = $1")
                .bind(&self.collection)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| store_error("Failed to count chunks", e))?;
        Ok(count as u64)
    }

    async fn drop_collection(&self) -> AppResult<()> {
        let removed = sqlx::query("DELETE FROM pdfrag_collections WHERE name = $1")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to drop collection", e))?
            .rows_affected();

        if removed > 0 {
            tracing::info!("Dropped collection '{}'", self.collection);
        }
        Ok(())
    }
}
