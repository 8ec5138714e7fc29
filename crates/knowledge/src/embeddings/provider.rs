//! Embedding provider trait and factory.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::providers::{HashEmbeddings, OpenAiEmbeddings};
use pdfrag_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "openai", "hash")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = config
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| AppError::missing_env("OPENAI_API_KEY"))?;

            Ok(Arc::new(
                OpenAiEmbeddings::new(&config.base_url, api_key, &config.model)
                    .with_batch_size(config.batch_size),
            ))
        }

        "hash" => Ok(Arc::new(HashEmbeddings::new(config.dimensions))),

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: openai, hash",
            config.provider
        ))),
    }
}
