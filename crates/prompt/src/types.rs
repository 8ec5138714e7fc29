//! Prompt types for pdfrag.

use serde::{Deserialize, Serialize};

/// Identifier of the built-in answering prompt.
pub const DEFAULT_PROMPT_ID: &str = "rag.answer";

/// Exact reply the model must give when the context lacks the answer.
pub const NO_INFORMATION_ANSWER: &str =
    "Não tenho informações necessárias para responder sua pergunta.";

/// Built-in answering template.
///
/// Renders `context` and `question`; the rules confine the model to the
/// retrieved context and fix the refusal sentence.
pub const DEFAULT_TEMPLATE: &str = r#"
CONTEXTO:
{{context}}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  "Não tenho informações necessárias para responder sua pergunta."
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: "Qual é a capital da França?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Quantos clientes temos em 2024?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Você acha isso bom ou ruim?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

PERGUNTA DO USUÁRIO:
{{question}}

RESPONDA A "PERGUNTA DO USUÁRIO"
"#;

/// A prompt definition, built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptDefinition {
    /// The built-in "answer only from context" prompt.
    pub fn builtin() -> Self {
        Self {
            id: DEFAULT_PROMPT_ID.to_string(),
            title: "Answer strictly from retrieved context".to_string(),
            api_version: "1.0".to_string(),
            created_by: "pdfrag".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// A fully rendered prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text, sent as the user message
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Size of the injected context in characters
    #[serde(rename = "contextChars")]
    pub context_chars: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: rag.answer
title: Custom
apiVersion: "1.0"
template: "{{context}} / {{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "rag.answer");
        assert_eq!(def.api_version, "1.0");
        assert!(def.created_by.is_empty());
    }

    #[test]
    fn test_builtin_template_carries_the_contract() {
        let def = PromptDefinition::builtin();
        assert_eq!(def.id, DEFAULT_PROMPT_ID);
        assert!(def.template.contains("{{context}}"));
        assert!(def.template.contains("{{question}}"));
        assert!(def.template.contains(NO_INFORMATION_ANSWER));
    }
}
