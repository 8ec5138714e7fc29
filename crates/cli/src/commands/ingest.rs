//! Ingest command handler.

use clap::Args;
use pdfrag_core::{config::AppConfig, AppResult, Stage};
use pdfrag_knowledge::{ingest_from_config, IngestOutcome};
use std::path::PathBuf;

/// Load, split, embed and store the PDF
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// PDF to ingest, relative to the workspace (default: PDF_PATH or document.pdf)
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let config = config.with_overrides(self.pdf.clone(), None, false, false);
        config.validate(Stage::Ingest)?;

        tracing::info!("Executing ingest command for {:?}", config.pdf_path);

        let outcome = ingest_from_config(&config).await?;

        if self.json {
            let output = match &outcome {
                IngestOutcome::Stored(stats) => serde_json::json!({
                    "status": "stored",
                    "pdf": stats.pdf_path,
                    "collection": stats.collection,
                    "pages": stats.pages,
                    "chunks": stats.chunks,
                    "durationSecs": stats.duration_secs,
                }),
                IngestOutcome::Empty { pages } => serde_json::json!({
                    "status": "empty",
                    "pdf": config.pdf_path,
                    "pages": pages,
                    "chunks": 0,
                }),
            };
            let text = serde_json::to_string_pretty(&output)?;
            println!("{}", text);
            return Ok(());
        }

        match outcome {
            IngestOutcome::Stored(stats) => println!(
                "Ingested {} chunks from {} pages of {} into '{}' in {:.2}s",
                stats.chunks,
                stats.pages,
                stats.pdf_path.display(),
                stats.collection,
                stats.duration_secs
            ),
            IngestOutcome::Empty { pages } => println!(
                "No text found in {} ({} pages); nothing to ingest",
                config.pdf_path.display(),
                pages
            ),
        }

        Ok(())
    }
}
