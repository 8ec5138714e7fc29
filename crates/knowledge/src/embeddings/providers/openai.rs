//! OpenAI embeddings provider.
//!
//! Works with any endpoint implementing the `/embeddings` API.

use crate::embeddings::provider::EmbeddingProvider;
use crate::embeddings::config::DEFAULT_BATCH_SIZE;
use pdfrag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embeddings client.
#[derive(Debug)]
pub struct OpenAiEmbeddings {
    base_url: String,
    api_key: String,
    model: String,
    batch_size: usize,
    client: reqwest::Client,
}

impl OpenAiEmbeddings {
    /// Create a provider for `model` at `base_url`.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            client: reqwest::Client::new(),
        }
    }

    /// Set the maximum number of texts per request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn request_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::Embedding(format!("Failed to send request to OpenAI: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "OpenAI embeddings API error ({}): {}",
                status, error_text
            )));
        }

        let mut body: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::Embedding(format!("Failed to parse OpenAI embeddings response: {}", e))
        })?;

        if body.data.len() != texts.len() {
            return Err(AppError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        body.data.sort_by_key(|d| d.index);
        if let Some((position, d)) = body
            .data
            .iter()
            .enumerate()
            .find(|(position, d)| d.index != *position)
        {
            return Err(AppError::Embedding(format!(
                "Unexpected embedding index {} at position {}",
                d.index, position
            )));
        }

        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "Embedding batch {} ({} texts, model: {})",
                i + 1,
                batch.len(),
                self.model
            );
            embeddings.extend(self.request_batch(batch).await?);
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_embed_batch_orders_by_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "text-embedding-3-small"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                    {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
                ],
                "model": "text-embedding-3-small"
            })))
            .mount(&server)
            .await;

        let provider = OpenAiEmbeddings::new(
            &format!("{}/v1/", server.uri()),
            "sk-test",
            "text-embedding-3-small",
        );
        let embeddings = provider.embed_batch(&texts(&["a", "b"])).await.unwrap();

        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_embed_batch_splits_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"index": 0, "embedding": [0.5, 0.5]}]
            })))
            .expect(3)
            .mount(&server)
            .await;

        let provider =
            OpenAiEmbeddings::new(&server.uri(), "sk-test", "m").with_batch_size(1);
        let embeddings = provider
            .embed_batch(&texts(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(embeddings.len(), 3);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"index": 0, "embedding": [1.0]}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiEmbeddings::new(&server.uri(), "sk-test", "m");
        let err = provider.embed_batch(&texts(&["a", "b"])).await.unwrap_err();
        assert!(err.to_string().contains("Expected 2 embeddings, got 1"));
    }

    #[tokio::test]
    async fn test_duplicate_index_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 0, "embedding": [1.0, 0.0]},
                    {"index": 0, "embedding": [0.0, 1.0]}
                ]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiEmbeddings::new(&server.uri(), "sk-test", "m");
        let err = provider.embed_batch(&texts(&["a", "b"])).await.unwrap_err();
        assert!(matches!(err, AppError::Embedding(_)));
        assert!(err.to_string().contains("index 0 at position 1"));
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 0, "embedding": [1.0]},
                    {"index": 5, "embedding": [0.5]}
                ]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiEmbeddings::new(&server.uri(), "sk-test", "m");
        let err = provider.embed_batch(&texts(&["a", "b"])).await.unwrap_err();
        assert!(err.to_string().contains("index 5 at position 1"));
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let provider = OpenAiEmbeddings::new(&server.uri(), "sk-bad", "m");
        let err = provider.embed("pergunta").await.unwrap_err();

        assert!(matches!(err, AppError::Embedding(_)));
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid api key"));
    }
}
