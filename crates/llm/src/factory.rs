//! LLM provider factory.
//!
//! Creates chat clients from a provider name, resolving the endpoint and
//! checking that required secrets are present.

use crate::client::LlmClient;
use crate::providers::OpenAiClient;
use pdfrag_core::config::DEFAULT_OPENAI_BASE_URL;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai")
/// * `base_url` - Optional custom endpoint URL
/// * `api_key` - API key for the provider
///
/// # Errors
/// Returns an error if the provider is unknown or its API key is missing.
pub fn create_client(
    provider: &str,
    base_url: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let api_key = api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| "OpenAI provider requires API key".to_string())?;
            let base_url = base_url.unwrap_or(DEFAULT_OPENAI_BASE_URL);
            Ok(Arc::new(OpenAiClient::with_base_url(base_url, api_key)))
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
