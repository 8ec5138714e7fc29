//! pdfrag core library
//!
//! Foundational utilities shared by every pdfrag crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration loading and environment validation

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, Stage};
pub use error::{AppError, AppResult};
