use super::RecordingLlm;
use crate::embeddings::{EmbeddingProvider, HashEmbeddings};
use crate::ingest::ingest_pdf;
use crate::loader::test_pdf::write_pdf;
use crate::search::RagEngine;
use crate::store::{SqliteStore, VectorStore};
use crate::types::{Document, StoredChunk};
use pdfrag_core::config::{ChunkingSettings, DEFAULT_CONFIG_FILE};
use pdfrag_core::AppConfig;
use pdfrag_prompt::{PromptDefinition, NO_INFORMATION_ANSWER};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(store: SqliteStore, llm: Arc<RecordingLlm>) -> RagEngine {
    RagEngine::new(
        Arc::new(HashEmbeddings::new(256)),
        Box::new(store),
        llm,
        PromptDefinition::builtin(),
        "gpt-4o-mini",
    )
}

#[tokio::test]
async fn test_answer_uses_retrieved_context() {
    let temp = TempDir::new().unwrap();
    let pdf = temp.path().join("lamina.pdf");
    write_pdf(
        &pdf,
        &[
            "A taxa de administracao do fundo e de 1,00% ao ano.",
            "O publico-alvo sao investidores qualificados.",
        ],
        None,
    );

    let store = SqliteStore::in_memory("lamina").unwrap();
    ingest_pdf(
        &pdf,
        &ChunkingSettings::default(),
        &HashEmbeddings::new(256),
        &store,
    )
    .await
    .unwrap();

    let llm = Arc::new(RecordingLlm::answering("1,00% ao ano."));
    let engine = engine(store, llm.clone());

    let answer = engine
        .search_prompt("Qual a taxa de administracao?")
        .await
        .unwrap();
    assert_eq!(answer, "1,00% ao ano.");

    let prompt = llm.last_prompt();
    assert!(prompt.contains("taxa de administracao do fundo"));
    assert!(prompt.contains("PERGUNTA DO USUÁRIO:\nQual a taxa de administracao?"));

    // Most similar chunk comes first in the context
    let taxa = prompt.find("taxa de administracao do fundo").unwrap();
    let publico = prompt.find("publico-alvo").unwrap();
    assert!(taxa < publico);
}

#[tokio::test]
async fn test_request_uses_model_and_zero_temperature() {
    let llm = Arc::new(RecordingLlm::answering("ok"));
    let engine = engine(SqliteStore::in_memory("lamina").unwrap(), llm.clone());

    engine.search_prompt("Qualquer coisa?").await.unwrap();

    let requests = llm.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].temperature, Some(0.0));
}

#[tokio::test]
async fn test_configured_engine_ignores_yaml_temperature() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join(DEFAULT_CONFIG_FILE),
        "llm:\n  temperature: 0.9\nretrieval:\n  topK: 3\n",
    )
    .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": NO_INFORMATION_ANSWER},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = AppConfig::load_from(temp.path().to_path_buf(), None).unwrap();
    assert_eq!(config.retrieval.top_k, 3);
    config.openai_api_key = Some("sk-test".to_string());
    config.openai_base_url = server.uri();
    config.chat_model = Some("gpt-4o-mini".to_string());
    config.embedding_provider = "hash".to_string();
    config.vector_store_url = Some("sqlite://:memory:".to_string());
    config.collection = Some("lamina".to_string());

    let engine = RagEngine::from_config(&config).await.unwrap();
    let answer = engine.search_prompt("Qual a taxa?").await.unwrap();
    assert_eq!(answer, NO_INFORMATION_ANSWER);
}

#[tokio::test]
async fn test_empty_store_sends_empty_context() {
    let llm = Arc::new(RecordingLlm::answering(NO_INFORMATION_ANSWER));
    let engine = engine(SqliteStore::in_memory("vazia").unwrap(), llm.clone());

    let answer = engine.search_prompt("Qual o CNPJ?").await.unwrap();
    assert_eq!(answer, NO_INFORMATION_ANSWER);
    assert!(llm.last_prompt().contains("CONTEXTO:\n\n"));
}

#[tokio::test]
async fn test_retrieval_is_limited_to_top_k() {
    let store = SqliteStore::in_memory("lamina").unwrap();
    let embedder = HashEmbeddings::new(256);

    let texts: Vec<String> = (0..15).map(|i| format!("trecho numero {}", i)).collect();
    let embeddings = embedder.embed_batch(&texts).await.unwrap();
    let chunks: Vec<StoredChunk> = texts
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (text, embedding))| StoredChunk {
            id: format!("doc-{}", i),
            document: Document::new(text.as_str()),
            embedding,
        })
        .collect();
    store.add_documents(&chunks).await.unwrap();

    let llm = Arc::new(RecordingLlm::answering("ok"));
    let default_engine = engine(store, llm);
    assert_eq!(default_engine.retrieve("trecho").await.unwrap().len(), 10);

    let narrow = default_engine.with_top_k(3);
    let results = narrow.retrieve("trecho").await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0].1 >= w[1].1));
    assert_eq!(narrow.store().count().await.unwrap(), 15);
}
