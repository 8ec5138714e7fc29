//! Pipeline tests spanning loader, splitter, embeddings, store and prompt.

mod retrieval;

use async_trait::async_trait;
use pdfrag_core::AppResult;
use pdfrag_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::Mutex;

/// Chat client that records prompts and replies with a fixed answer.
#[derive(Default)]
pub(crate) struct RecordingLlm {
    pub answer: String,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl RecordingLlm {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for RecordingLlm {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(LlmResponse {
            content: self.answer.clone(),
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
        })
    }
}
