//! Configuration management for pdfrag.
//!
//! Configuration is assembled from several layers, later layers winning:
//! - Built-in defaults
//! - A `.env` file in the workspace (never overrides the real environment)
//! - An optional YAML file (`pdfrag.yaml`) with chunking/retrieval tuning
//! - Environment variables
//! - Command-line flags
//!
//! Required variables are only checked by [`AppConfig::validate`], so that
//! commands needing fewer settings can still run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default OpenAI-compatible API endpoint.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Embedding model used for ingestion when `EMBEDDING_MODEL` is unset.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default PDF file name, relative to the workspace.
pub const DEFAULT_PDF_FILE: &str = "document.pdf";

/// Default YAML settings file name, relative to the workspace.
pub const DEFAULT_CONFIG_FILE: &str = "pdfrag.yaml";

/// Pipeline stage whose requirements are being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Load, split, embed and store a PDF.
    Ingest,
    /// Embed a question, retrieve context and generate an answer.
    Query,
}

impl Stage {
    /// Environment variables that must be set (and non-empty) for this stage,
    /// in the order they are checked.
    pub fn required_vars(&self) -> &'static [&'static str] {
        match self {
            Stage::Ingest => &["OPENAI_API_KEY", "PGVECTOR_URL", "PGVECTOR_COLLECTION"],
            Stage::Query => &[
                "OPENAI_API_KEY",
                "PGVECTOR_URL",
                "PGVECTOR_COLLECTION",
                "OPENAI_MODEL",
                "EMBEDDING_MODEL",
            ],
        }
    }
}

/// Text splitting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingSettings {
    /// Maximum chunk size in characters
    #[serde(rename = "chunkSize", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(rename = "chunkOverlap", default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    150
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Number of chunks fed to the model as context
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    10
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Workspace root (holds `.env`, `pdfrag.yaml`, `prompts/` and the PDF)
    pub workspace: PathBuf,

    /// Optional YAML settings file
    pub config_file: Option<PathBuf>,

    /// API key for embeddings and chat completions (`OPENAI_API_KEY`)
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible endpoint (`OPENAI_BASE_URL`)
    pub openai_base_url: String,

    /// Chat model (`OPENAI_MODEL`)
    pub chat_model: Option<String>,

    /// Embedding model (`EMBEDDING_MODEL`)
    pub embedding_model: Option<String>,

    /// Embedding provider: "openai" or "hash" (`EMBEDDING_PROVIDER`)
    pub embedding_provider: String,

    /// Vector store connection URL (`PGVECTOR_URL`)
    #[serde(skip_serializing)]
    pub vector_store_url: Option<String>,

    /// Vector store collection (`PGVECTOR_COLLECTION`)
    pub collection: Option<String>,

    /// PDF to ingest (`PDF_PATH`)
    pub pdf_path: PathBuf,

    /// Text splitting settings
    pub chunking: ChunkingSettings,

    /// Retrieval settings
    pub retrieval: RetrievalSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// YAML settings file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    chunking: Option<ChunkingSettings>,
    retrieval: Option<RetrievalSettings>,
    logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSettings {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            pdf_path: workspace.join(DEFAULT_PDF_FILE),
            workspace,
            config_file: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            chat_model: None,
            embedding_model: None,
            embedding_provider: "openai".to_string(),
            vector_store_url: None,
            collection: None,
            chunking: ChunkingSettings::default(),
            retrieval: RetrievalSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration for the current directory.
    ///
    /// Honors `PDFRAG_WORKSPACE` and `PDFRAG_CONFIG`.
    ///
    /// # Example
    /// ```no_run
    /// use pdfrag_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let workspace = match std::env::var("PDFRAG_WORKSPACE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => std::env::current_dir()?,
        };
        let config_file = std::env::var("PDFRAG_CONFIG").ok().map(PathBuf::from);

        Self::load_from(workspace, config_file)
    }

    /// Load configuration rooted at `workspace`.
    pub fn load_from(workspace: PathBuf, config_file: Option<PathBuf>) -> AppResult<Self> {
        if !workspace.is_dir() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                workspace
            )));
        }

        // Populate the process environment from .env before reading it
        let dotenv_path = workspace.join(".env");
        if dotenv_path.is_file() {
            dotenvy::from_path(&dotenv_path).map_err(|e| {
                AppError::Config(format!("Failed to load {:?}: {}", dotenv_path, e))
            })?;
            tracing::debug!("Loaded environment from {:?}", dotenv_path);
        }

        let mut config = Self {
            pdf_path: workspace.join(DEFAULT_PDF_FILE),
            workspace,
            config_file,
            ..Self::default()
        };

        let settings_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.workspace.join(DEFAULT_CONFIG_FILE));

        if settings_path.exists() {
            config.merge_yaml(&settings_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                settings_path
            )));
        }

        config.apply_env(|key| std::env::var(key).ok());
        config.check_settings()?;

        Ok(config)
    }

    /// Merge a YAML settings file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let settings: SettingsFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(chunking) = settings.chunking {
            self.chunking = chunking;
        }

        if let Some(retrieval) = settings.retrieval {
            self.retrieval = retrieval;
        }

        if let Some(logging) = settings.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        tracing::debug!("Merged settings from {:?}", path);
        Ok(())
    }

    /// Apply environment variables through `lookup`.
    ///
    /// Empty values are kept as `Some("")` so that validation reports them
    /// the same way as unset ones.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }

        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            self.openai_base_url = url;
        }

        if let Some(model) = lookup("OPENAI_MODEL") {
            self.chat_model = Some(model);
        }

        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.embedding_model = Some(model);
        }

        if let Some(provider) = lookup("EMBEDDING_PROVIDER").filter(|v| !v.is_empty()) {
            self.embedding_provider = provider.to_lowercase();
        }

        if let Some(url) = lookup("PGVECTOR_URL") {
            self.vector_store_url = Some(url);
        }

        if let Some(collection) = lookup("PGVECTOR_COLLECTION") {
            self.collection = Some(collection);
        }

        if let Some(path) = lookup("PDF_PATH").filter(|v| !v.is_empty()) {
            self.pdf_path = self.workspace.join(path);
        }

        if let Some(level) = lookup("RUST_LOG").filter(|v| !v.is_empty()) {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").filter(|v| !v.is_empty()).is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(
        mut self,
        pdf_path: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(pdf_path) = pdf_path {
            self.pdf_path = self.workspace.join(pdf_path);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Check the tuning settings for internal consistency.
    pub fn check_settings(&self) -> AppResult<()> {
        if self.chunking.chunk_size == 0 {
            return Err(AppError::Config(
                "chunkSize must be greater than zero".to_string(),
            ));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(AppError::Config(format!(
                "chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "topK must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate that every variable required by `stage` is present.
    pub fn validate(&self, stage: Stage) -> AppResult<()> {
        for name in stage.required_vars() {
            if self.env_value(name).map_or(true, str::is_empty) {
                return Err(AppError::missing_env(name));
            }
        }

        self.check_settings()
    }

    /// Current value of a required variable.
    fn env_value(&self, name: &str) -> Option<&str> {
        match name {
            "OPENAI_API_KEY" => self.openai_api_key.as_deref(),
            "PGVECTOR_URL" => self.vector_store_url.as_deref(),
            "PGVECTOR_COLLECTION" => self.collection.as_deref(),
            "OPENAI_MODEL" => self.chat_model.as_deref(),
            "EMBEDDING_MODEL" => self.embedding_model.as_deref(),
            _ => None,
        }
    }

    /// Embedding model, falling back to [`DEFAULT_EMBEDDING_MODEL`].
    pub fn embedding_model_or_default(&self) -> &str {
        self.embedding_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_EMBEDDING_MODEL)
    }

    /// Vector store URL; errors like validation when it is missing.
    pub fn require_vector_store_url(&self) -> AppResult<&str> {
        self.vector_store_url
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::missing_env("PGVECTOR_URL"))
    }

    /// Collection name; errors like validation when it is missing.
    pub fn require_collection(&self) -> AppResult<&str> {
        self.collection
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::missing_env("PGVECTOR_COLLECTION"))
    }

    /// Chat model; errors like validation when it is missing.
    pub fn require_chat_model(&self) -> AppResult<&str> {
        self.chat_model
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::missing_env("OPENAI_MODEL"))
    }

    /// Directory holding YAML prompt overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.workspace.join("prompts")
    }
}
