//! Collection maintenance: stats and clean.

use clap::Args;
use pdfrag_core::{config::AppConfig, AppResult};

/// Show collection statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = pdfrag_knowledge::collection_stats(config).await?;

        if self.json {
            let text = serde_json::to_string_pretty(&stats)?;
            println!("{}", text);
        } else {
            println!("Collection: {}", stats.collection);
            println!("Backend:    {}", stats.backend);
            println!("Chunks:     {}", stats.chunks);
        }

        Ok(())
    }
}

/// Drop the collection
#[derive(Args, Debug)]
pub struct CleanCommand {}

impl CleanCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing clean command");

        pdfrag_knowledge::clean_collection(config).await?;

        println!("Collection '{}' removed", config.require_collection()?);
        Ok(())
    }
}
