//! Embedding configuration.

use pdfrag_core::config::DEFAULT_OPENAI_BASE_URL;
use pdfrag_core::AppConfig;

/// Dimensions of the offline hashing provider.
pub const DEFAULT_HASH_DIMENSIONS: usize = 384;

/// Texts sent per embeddings request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Settings used to build an [`EmbeddingProvider`](super::EmbeddingProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "openai" or "hash"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// API key (openai only)
    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint
    pub base_url: String,

    /// Vector dimensions (hash only; openai vectors are sized by the model)
    pub dimensions: usize,

    /// Maximum texts per request
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: pdfrag_core::config::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            dimensions: DEFAULT_HASH_DIMENSIONS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl EmbeddingConfig {
    /// Derive embedding settings from the application config.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            provider: config.embedding_provider.clone(),
            model: config.embedding_model_or_default().to_string(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            ..Self::default()
        }
    }

    /// Offline hashing configuration.
    pub fn hash(dimensions: usize) -> Self {
        Self {
            provider: "hash".to_string(),
            model: "hash-v1".to_string(),
            dimensions,
            ..Self::default()
        }
    }
}
