//! Command handlers for the pdfrag CLI.

pub mod ask;
pub mod chat;
pub mod collection;
pub mod ingest;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use collection::{CleanCommand, StatsCommand};
pub use ingest::IngestCommand;
