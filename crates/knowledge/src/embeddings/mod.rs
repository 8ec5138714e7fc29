//! Embedding providers.
//!
//! Turns chunk texts and questions into vectors. The same provider and
//! model must be used at ingestion and query time.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{HashEmbeddings, OpenAiEmbeddings};
