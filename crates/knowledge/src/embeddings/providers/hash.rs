//! Offline embedding provider based on feature hashing.

use crate::embeddings::provider::EmbeddingProvider;
use pdfrag_core::AppResult;
use std::collections::BTreeMap;

/// Words too common to discriminate between chunks.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "with", "from", "this", "that", "have", "has",
    "its", "their", "they", "them", "que", "com", "para", "por", "uma", "dos", "das", "nos",
    "nas", "seu", "sua", "ser", "não", "mais", "como", "pelo", "pela", "são", "este", "esta",
];

/// Deterministic, content-dependent embeddings computed locally.
///
/// Each word contributes to one dimension and each of its character
/// trigrams to another; the result is scaled to unit length. Not semantic,
/// but texts sharing vocabulary score high, which is enough for offline
/// runs and tests.
#[derive(Debug)]
pub struct HashEmbeddings {
    dimensions: usize,
}

impl HashEmbeddings {
    /// Create a provider producing vectors of `dimensions` entries.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();

        // Ordered map keeps float accumulation order stable
        let mut word_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let idx = bucket(window.iter().collect::<String>().as_bytes(), 37, self.dimensions);
                embedding[idx] += (*freq as f32).sqrt();
            }

            let idx = bucket(word.as_bytes(), 31, self.dimensions);
            embedding[idx] += *freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

fn bucket(bytes: &[u8], multiplier: u64, dimensions: usize) -> usize {
    let hash = bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_mul(multiplier).wrapping_add(b as u64));
    (hash % dimensions as u64) as usize
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbeddings {
    fn provider_name(&self) -> &str {
        "hash"
    }

    fn model_name(&self) -> &str {
        "hash-v1"
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_embeddings_are_unit_vectors() {
        let provider = HashEmbeddings::new(384);
        let texts = vec![
            "Taxa de administração de 1,00% ao ano".to_string(),
            "Política de investimento do fundo".to_string(),
        ];

        let embeddings = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 2);
        for embedding in &embeddings {
            assert_eq!(embedding.len(), 384);
            assert!((norm(embedding) - 1.0).abs() < 0.001);
        }
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = HashEmbeddings::new(384);
        let a = provider.embed("resgate em D+1").await.unwrap();
        let b = provider.embed("resgate em D+1").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_shared_vocabulary_scores_higher() {
        let provider = HashEmbeddings::new(384);
        let question = provider.embed("Qual a taxa de administração?").await.unwrap();
        let related = provider
            .embed("A taxa de administração é de 1,00% ao ano.")
            .await
            .unwrap();
        let unrelated = provider
            .embed("O público-alvo são investidores qualificados.")
            .await
            .unwrap();

        assert!(dot(&question, &related) > dot(&question, &unrelated));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = HashEmbeddings::new(16);
        let embedding = provider.embed("").await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }
}
