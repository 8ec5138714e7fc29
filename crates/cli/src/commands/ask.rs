//! Ask command handler.

use clap::Args;
use pdfrag_core::{config::AppConfig, AppResult, Stage};
use pdfrag_knowledge::RagEngine;

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question
    pub question: String,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate(Stage::Query)?;
        tracing::info!("Executing ask command");

        let engine = RagEngine::from_config(config).await?;
        let answer = engine.search_prompt(self.question.trim()).await?;

        println!("{}", answer);
        Ok(())
    }
}
