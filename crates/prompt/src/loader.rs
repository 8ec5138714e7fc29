//! Prompt loader for YAML prompt overrides.

use crate::builder::references_variable;
use crate::types::{PromptDefinition, DEFAULT_PROMPT_ID};
use pdfrag_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID from `prompts_dir`.
///
/// Looks for `<prompts_dir>/<id>.yml`.
///
/// # Example
/// ```no_run
/// use pdfrag_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("prompts"), "rag.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Resolve the answering prompt: a workspace override when present,
/// otherwise the built-in definition.
pub fn resolve_prompt(prompts_dir: &Path) -> AppResult<PromptDefinition> {
    let override_file = prompts_dir.join(format!("{}.yml", DEFAULT_PROMPT_ID));
    if override_file.exists() {
        return load_prompt(prompts_dir, DEFAULT_PROMPT_ID);
    }

    tracing::debug!("Using built-in prompt '{}'", DEFAULT_PROMPT_ID);
    Ok(PromptDefinition::builtin())
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for variable in ["context", "question"] {
        if !references_variable(&def.template, variable) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' must reference {{{{{}}}}}",
                def.id, variable
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(format!("{}.yml", id)), body).unwrap();
    }

    const VALID: &str = r#"
id: rag.answer
title: "Short answers"
apiVersion: "1.0"
template: "Context: {{context}}\nQuestion: {{ question }}"
"#;

    #[test]
    fn test_load_valid_prompt() {
        let temp = TempDir::new().unwrap();
        write_prompt(temp.path(), "rag.answer", VALID);

        let prompt = load_prompt(temp.path(), "rag.answer").unwrap();
        assert_eq!(prompt.title, "Short answers");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp = TempDir::new().unwrap();
        assert!(load_prompt(temp.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        write_prompt(temp.path(), "broken", "invalid: yaml: content:");
        assert!(load_prompt(temp.path(), "broken").is_err());
    }

    #[test]
    fn test_template_must_reference_question() {
        let temp = TempDir::new().unwrap();
        write_prompt(
            temp.path(),
            "rag.answer",
            "id: rag.answer\ntitle: t\napiVersion: \"1.0\"\ntemplate: \"{{context}} only\"\n",
        );

        let err = load_prompt(temp.path(), "rag.answer").unwrap_err();
        assert!(err.to_string().contains("{{question}}"));
    }

    #[test]
    fn test_invalid_api_version() {
        let temp = TempDir::new().unwrap();
        write_prompt(
            temp.path(),
            "rag.answer",
            "id: rag.answer\ntitle: t\napiVersion: \"1\"\ntemplate: \"{{context}} {{question}}\"\n",
        );

        assert!(load_prompt(temp.path(), "rag.answer").is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_builtin() {
        let temp = TempDir::new().unwrap();
        let prompt = resolve_prompt(&temp.path().join("prompts")).unwrap();
        assert_eq!(prompt.created_by, "pdfrag");
    }

    #[test]
    fn test_resolve_prefers_override() {
        let temp = TempDir::new().unwrap();
        write_prompt(temp.path(), "rag.answer", VALID);

        let prompt = resolve_prompt(temp.path()).unwrap();
        assert_eq!(prompt.title, "Short answers");
    }
}
