//! Query pipeline: embed question → retrieve → generate.

use crate::embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
use crate::store::{open_store, VectorStore};
use crate::types::Document;
use pdfrag_core::{AppConfig, AppError, AppResult};
use pdfrag_llm::{create_client, LlmClient, LlmRequest};
use pdfrag_prompt::{build_prompt, resolve_prompt, PromptDefinition};
use std::sync::Arc;

/// Separator placed between retrieved chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Sampling temperature of every answer request.
pub const ANSWER_TEMPERATURE: f32 = 0.0;

/// Answers questions from the stored chunks.
///
/// Holds every component of the query pipeline so they are created once
/// and reused across questions.
pub struct RagEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Box<dyn VectorStore>,
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    chat_model: String,
    top_k: usize,
}

impl RagEngine {
    /// Assemble an engine from its parts, retrieving 10 chunks per question.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Box<dyn VectorStore>,
        llm: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            prompt,
            chat_model: chat_model.into(),
            top_k: 10,
        }
    }

    /// Set the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Build every component from the application config.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let embedder = create_provider(&EmbeddingConfig::from_app_config(config))?;
        let store = open_store(
            config.require_vector_store_url()?,
            config.require_collection()?,
        )
        .await?;
        let llm = create_client(
            "openai",
            Some(&config.openai_base_url),
            config.openai_api_key.as_deref(),
        )
        .map_err(AppError::Llm)?;
        let prompt = resolve_prompt(&config.prompts_dir())?;

        Ok(Self::new(
            embedder,
            store,
            llm,
            prompt,
            config.require_chat_model()?,
        )
        .with_top_k(config.retrieval.top_k))
    }

    /// The vector store questions are answered from.
    pub fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }

    /// Retrieve the chunks most similar to `question`, best first.
    pub async fn retrieve(&self, question: &str) -> AppResult<Vec<(Document, f32)>> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = self
            .store
            .similarity_search_with_score(&query_embedding, self.top_k)
            .await?;

        for (rank, (doc, score)) in results.iter().enumerate() {
            tracing::debug!(
                "#{} score={:.3} page={} chars={}",
                rank + 1,
                score,
                doc.metadata.get("page").map(|p| p.to_string()).unwrap_or_default(),
                doc.page_content.chars().count()
            );
        }

        Ok(results)
    }

    /// Answer `question` using only the retrieved context.
    ///
    /// The model's text is returned unchanged. With nothing retrieved the
    /// context is empty and the prompt instructs the model to refuse.
    pub async fn search_prompt(&self, question: &str) -> AppResult<String> {
        tracing::info!("Answering question ({} chars)", question.chars().count());

        let results = self.retrieve(question).await?;
        if results.is_empty() {
            tracing::warn!(
                "No chunks retrieved from collection '{}'",
                self.store.collection()
            );
        }

        let context = build_context(&results);
        let built = build_prompt(&self.prompt, &context, question)?;

        let request =
            LlmRequest::new(built.text, &self.chat_model).with_temperature(ANSWER_TEMPERATURE);
        let response = self.llm.complete(&request).await?;

        tracing::debug!(
            "Answer generated by {} ({} prompt tokens, {} completion tokens)",
            response.model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        Ok(response.content)
    }
}

/// Join chunk texts in retrieval order.
pub fn build_context(results: &[(Document, f32)]) -> String {
    results
        .iter()
        .map(|(doc, _)| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
