//! Prompt builder: renders the answering template with context and question.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use handlebars::Handlebars;
use pdfrag_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition, the retrieved context and the question.
///
/// # Example
/// ```
/// use pdfrag_prompt::{build_prompt, PromptDefinition};
///
/// let def = PromptDefinition::builtin();
/// let built = build_prompt(&def, "O fundo aplica em renda fixa.", "Onde o fundo aplica?").unwrap();
/// assert!(built.text.contains("Onde o fundo aplica?"));
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    context: &str,
    question: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(
        "Building prompt '{}' ({} context chars)",
        definition.id,
        context.len()
    );

    for variable in ["context", "question"] {
        if !references_variable(&definition.template, variable) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' must reference {{{{{}}}}}",
                definition.id, variable
            )));
        }
    }

    let variables = HashMap::from([("context", context), ("question", question)]);
    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            context_chars: context.chars().count(),
        },
    })
}

/// Render a Handlebars template with variables.
///
/// Strict mode turns a reference to a missing variable into an error.
fn render_template(template: &str, variables: &HashMap<&str, &str>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompts: no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Whether `template` contains a `{{name}}` expression (whitespace allowed).
pub(crate) fn references_variable(template: &str, name: &str) -> bool {
    template.split("{{").skip(1).any(|rest| {
        rest.split("}}")
            .next()
            .map(|expr| expr.trim_start_matches('{').trim() == name)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_INFORMATION_ANSWER;

    fn custom(template: &str) -> PromptDefinition {
        PromptDefinition {
            template: template.to_string(),
            ..PromptDefinition::builtin()
        }
    }

    #[test]
    fn test_render_builtin_prompt() {
        let def = PromptDefinition::builtin();
        let built = build_prompt(&def, "Taxa de administração: 1,00% a.a.", "Qual a taxa?").unwrap();

        assert!(built.text.contains("CONTEXTO:\nTaxa de administração: 1,00% a.a."));
        assert!(built.text.contains("PERGUNTA DO USUÁRIO:\nQual a taxa?"));
        assert!(built.text.contains(NO_INFORMATION_ANSWER));
        assert_eq!(built.metadata.source_prompt_id, "rag.answer");
    }

    #[test]
    fn test_context_is_not_html_escaped() {
        let def = custom("{{context}}|{{question}}");
        let built = build_prompt(&def, "a < b & \"c\"", "x > y?").unwrap();
        assert_eq!(built.text, "a < b & \"c\"|x > y?");
    }

    #[test]
    fn test_empty_context_still_renders() {
        let def = custom("[{{context}}]{{question}}");
        let built = build_prompt(&def, "", "q").unwrap();
        assert_eq!(built.text, "[]q");
        assert_eq!(built.metadata.context_chars, 0);
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let def = custom("{{context}} {{question}} {{missing}}");
        assert!(build_prompt(&def, "c", "q").is_err());
    }

    #[test]
    fn test_template_without_question_is_rejected() {
        let def = custom("Contexto: {{context}}");
        let err = build_prompt(&def, "c", "q").unwrap_err();
        assert!(err.to_string().contains("{{question}}"));
    }

    #[test]
    fn test_references_variable() {
        assert!(references_variable("A {{ context }} B", "context"));
        assert!(references_variable("{{{question}}}", "question"));
        assert!(!references_variable("{{contexts}}", "context"));
        assert!(!references_variable("context", "context"));
    }
}
