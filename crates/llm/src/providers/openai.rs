//! OpenAI chat completions provider.
//!
//! Works with any endpoint implementing the `/chat/completions` API.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use pdfrag_core::{config::DEFAULT_OPENAI_BASE_URL, AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completions response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI chat client.
pub struct OpenAiClient {
    /// Base URL, without trailing slash
    base_url: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client against the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENAI_BASE_URL, api_key)
    }

    /// Create a client against a custom OpenAI-compatible endpoint.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_api_request<'a>(&self, request: &'a LlmRequest) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatCompletionRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn convert_response(response: ChatCompletionResponse) -> AppResult<LlmResponse> {
        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("OpenAI response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to OpenAI (model: {})", request.model);
        tracing::debug!("Prompt length: {} chars", request.prompt.len());

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.to_api_request(request))
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        let response = Self::convert_response(api_response)?;

        tracing::info!("Received completion from OpenAI");
        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(response)
    }
}
