//! Prompt system for pdfrag.
//!
//! Owns the "answer only from context" contract:
//! - The built-in answering template and its refusal sentence
//! - YAML overrides loaded from the workspace `prompts/` directory
//! - Handlebars rendering of `context` and `question`

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{load_prompt, resolve_prompt};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptDefinition, DEFAULT_PROMPT_ID, NO_INFORMATION_ANSWER,
};
