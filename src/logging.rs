//! File logging bootstrap.
//!
//! The TUI owns the terminal, so log records only ever go to a rolling file
//! under `<data_dir>/logs`. `RUST_LOG` wins over the configured level.

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "smart_timetable";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

pub const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Directory the log files are written to
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Start the file logger; keep the returned handle alive for the process.
pub fn init_logging(level: &str, data_dir: &Path) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    let dir = log_dir(data_dir);

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let handle = Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log level '{}'", level))?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    info!(
        "event=app_start version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        dir.display()
    );

    Ok(handle)
}

/// Canonical level name, accepting `warning` and any casing
pub fn normalize_level(level: &str) -> Result<&'static str> {
    let lowered = level.trim().to_ascii_lowercase();
    let lowered = if lowered == "warning" { "warn".to_string() } else { lowered };

    LEVELS
        .iter()
        .find(|l| **l == lowered)
        .copied()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "unsupported log level '{}', expected one of {}",
                level.trim(),
                LEVELS.join("|")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert_eq!(normalize_level("off").unwrap(), "off");
    }

    #[test]
    fn test_normalize_level_rejects_unknown() {
        let err = normalize_level("loud").unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_log_dir_is_under_data_dir() {
        assert_eq!(
            log_dir(Path::new("/tmp/stt")),
            PathBuf::from("/tmp/stt/logs")
        );
    }
}
