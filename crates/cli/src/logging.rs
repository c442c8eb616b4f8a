use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// `media_log-HH_MM_SS_MM_DD_YYYY.log`, prefixed `[DEBUG] ` in debug mode.
pub fn log_file_name(debug: bool, now: DateTime<Local>) -> String {
    let prefix = if debug { "[DEBUG] " } else { "" };
    format!("{prefix}{}", now.format("media_log-%H_%M_%S_%m_%d_%Y.log"))
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Install the global subscriber. Returns the log file path when `to_file`.
pub fn init(debug: bool, to_file: bool, dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(if debug { "debug" } else { "warn" }));

    if !to_file {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(log_file_name(debug, Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(filter(if debug { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(path))
}
