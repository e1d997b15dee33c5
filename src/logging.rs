// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`, plus the
//! colour-tagged status lines emitted by the pipeline tasks.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SITEFLOW_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`

use anyhow::Result;
use console::style;
use tracing::{info, warn};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

const ICON_SUCCESS: &str = "✓";
const ICON_WARN: &str = "⚠";
const ICON_INFO: &str = "ℹ";

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup; calling it twice panics, and we only call
/// it from `main`.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("SITEFLOW_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

/// Blue informational status line, e.g. "ℹ Styles compiled".
pub fn status_info(msg: &str) {
    info!("{}", style(format!("{ICON_INFO} {msg}")).blue());
}

/// Green success status line, e.g. "✓ Linted".
pub fn status_success(msg: &str) {
    info!("{}", style(format!("{ICON_SUCCESS} {msg}")).green());
}

/// Yellow warning status line, e.g. the unoptimised-build note.
pub fn status_warn(msg: &str) {
    warn!("{}", style(format!("{ICON_WARN} {msg}")).yellow());
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
