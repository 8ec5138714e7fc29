//! pdfrag CLI
//!
//! Ingest a PDF into a vector store and answer questions about it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, CleanCommand, IngestCommand, StatsCommand};
use pdfrag_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use std::process::ExitCode;

/// pdfrag - answer questions about a PDF, strictly from its content
#[derive(Parser, Debug)]
#[command(name = "pdfrag")]
#[command(about = "Answer questions about a PDF using retrieval-augmented generation", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PDFRAG_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to YAML settings file (default: <workspace>/pdfrag.yaml)
    #[arg(short, long, global = true, env = "PDFRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load, split, embed and store the PDF
    Ingest(IngestCommand),

    /// Answer a single question
    Ask(AskCommand),

    /// Interactive question loop
    Chat(ChatCommand),

    /// Show collection statistics
    Stats(StatsCommand),

    /// Drop the collection
    Clean(CleanCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ingest(_) => "ingest",
            Commands::Ask(_) => "ask",
            Commands::Chat(_) => "chat",
            Commands::Stats(_) => "stats",
            Commands::Clean(_) => "clean",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let workspace = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let config = AppConfig::load_from(workspace, cli.config)?.with_overrides(
        None,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Embedding provider: {}", config.embedding_provider);

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
        Commands::Clean(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
