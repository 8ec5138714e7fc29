//! Logging infrastructure for pdfrag.
//!
//! Logs go to stderr so that answers printed on stdout stay clean.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// The filter comes from `log_level` when given, otherwise from
/// `RUST_LOG`, otherwise `info`.
///
/// # Example
/// ```no_run
/// use pdfrag_core::logging::init_logging;
///
/// init_logging(Some("debug"), false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(use_color(no_color));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Decide whether log output may contain ANSI colour codes.
fn use_color(no_color: bool) -> bool {
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if no_color || no_color_env {
        return false;
    }

    std::io::stderr().is_terminal()
}
