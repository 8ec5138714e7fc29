//! Embedding provider implementations.

pub mod hash;
pub mod openai;

pub use hash::HashEmbeddings;
pub use openai::OpenAiEmbeddings;
