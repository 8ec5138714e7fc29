//! LLM client abstraction and request/response types.

use pdfrag_core::AppResult;
use serde::{Deserialize, Serialize};

/// Chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The prompt text, sent as the user message
    pub prompt: String,

    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl LlmRequest {
    /// Create a new LLM request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
            system: None,
        }
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for chat completion providers.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// Perform a single, non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
