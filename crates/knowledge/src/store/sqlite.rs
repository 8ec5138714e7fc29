//! SQLite-backed vector store.
//!
//! Embeddings are stored as little-endian `f32` blobs and searched
//! exhaustively with cosine similarity.

use super::{cosine_similarity, VectorStore};
use crate::types::{Document, Metadata, StoredChunk};
use pdfrag_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS collections (
        name TEXT PRIMARY KEY,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS embeddings (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        document TEXT NOT NULL,
        metadata TEXT NOT NULL,
        embedding BLOB NOT NULL,
        PRIMARY KEY (collection, id),
        FOREIGN KEY (collection) REFERENCES collections(name) ON DELETE CASCADE
    );
"#;

/// Vector store in a local SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    collection: String,
}

impl SqliteStore {
    /// Open (or create) the database file at `db_path`.
    pub fn open(db_path: &Path, collection: &str) -> AppResult<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Store(format!("Failed to create store directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Store(format!("Failed to open SQLite store: {}", e)))?;

        tracing::debug!("Opened SQLite store at {:?}", db_path);
        Self::init(conn, collection)
    }

    /// Open a private in-memory database.
    pub fn in_memory(collection: &str) -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Store(format!("Failed to open SQLite store: {}", e)))?;
        Self::init(conn, collection)
    }

    fn init(conn: Connection, collection: &str) -> AppResult<Self> {
        conn.execute_batch(&format!("PRAGMA foreign_keys = ON;{}", SCHEMA))
            .map_err(|e| AppError::Store(format!("Failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Store("SQLite connection lock poisoned".to_string()))
    }

    fn ensure_collection(conn: &Connection, name: &str) -> AppResult<()> {
        conn.execute(
            "INSERT OR IGNORE INTO collections (name, created_at) VALUES (?1, ?2)",
            params![name, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| AppError::Store(format!("Failed to create collection: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl VectorStore for SqliteStore {
    fn backend_name(&self) -> &str {
        "sqlite"
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn reset_collection(&self) -> AppResult<()> {
        let conn = self.lock()?;
        Self::ensure_collection(&conn, &self.collection)?;

        let deleted = conn
            .execute(
                "DELETE FROM embeddings WHERE collection = ?1",
                params![self.collection],
            )
            .map_err(|e| AppError::Store(format!("Failed to delete chunks: {}", e)))?;

        tracing::debug!(
            "Reset collection '{}' ({} chunks removed)",
            self.collection,
            deleted
        );
        Ok(())
    }

    async fn add_documents(&self, chunks: &[StoredChunk]) -> AppResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Store(format!("Failed to begin transaction: {}", e)))?;

        Self::ensure_collection(&tx, &self.collection)?;

        for chunk in chunks {
            let metadata_json = serde_json::to_string(&chunk.document.metadata)?;
            tx.execute(
                "INSERT OR REPLACE INTO embeddings (collection, id, document, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    self.collection,
                    chunk.id,
                    chunk.document.page_content,
                    metadata_json,
                    embedding_to_bytes(&chunk.embedding),
                ],
            )
            .map_err(|e| AppError::Store(format!("Failed to insert chunk {}: {}", chunk.id, e)))?;
        }

        tx.commit()
            .map_err(|e| AppError::Store(format!("Failed to commit chunks: {}", e)))?;

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
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT document, metadata, embedding FROM embeddings
                 WHERE collection = ?1 ORDER BY rowid",
            )
            .map_err(|e| AppError::Store(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![self.collection], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                ))
            })
            .map_err(|e| AppError::Store(format!("Failed to query chunks: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (page_content, metadata_json, embedding_bytes) =
                row.map_err(|e| AppError::Store(format!("Failed to read chunk: {}", e)))?;
            let metadata: Metadata = serde_json::from_str(&metadata_json)?;
            let embedding = bytes_to_embedding(&embedding_bytes)?;
            if embedding.len() != query_embedding.len() {
                return Err(AppError::Store(format!(
                    "Query embedding has {} dimensions, collection '{}' stores {}",
                    query_embedding.len(),
                    self.collection,
                    embedding.len()
                )));
            }
            let score = cosine_similarity(query_embedding, &embedding);
            results.push((
                Document {
                    page_content,
                    metadata,
                },
                score,
            ));
        }

        // Stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        tracing::debug!(
            "Retrieved {} chunks (requested top-{})",
            results.len(),
            k
        );

        Ok(results)
    }

    async fn count(&self) -> AppResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM embeddings WHERE collection = ?1",
                params![self.collection],
                |row| row.get(0),
            )
            .map_err(|e| AppError::Store(format!("Failed to count chunks: {}", e)))?;
        Ok(count as u64)
    }

    async fn drop_collection(&self) -> AppResult<()> {
        let conn = self.lock()?;
        let existed = conn
            .query_row(
                "SELECT name FROM collections WHERE name = ?1",
                params![self.collection],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| AppError::Store(format!("Failed to look up collection: {}", e)))?
            .is_some();

        conn.execute(
            "DELETE FROM collections WHERE name = ?1",
            params![self.collection],
        )
        .map_err(|e| AppError::Store(format!("Failed to drop collection: {}", e)))?;

        if existed {
            tracing::info!("Dropped collection '{}'", self.collection);
        }
        Ok(())
    }
}

/// Convert embedding vector to bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Convert bytes back to embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Store(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
