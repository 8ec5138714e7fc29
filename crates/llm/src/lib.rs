//! Chat completion crate for pdfrag.
//!
//! A provider-agnostic trait for single-shot completions, with an
//! implementation for OpenAI-compatible endpoints.
//!
//! # Example
//! ```no_run
//! use pdfrag_llm::{LlmClient, LlmRequest, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = LlmRequest::new("Hello, world!", "gpt-4o-mini").with_temperature(0.0);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OpenAiClient;
