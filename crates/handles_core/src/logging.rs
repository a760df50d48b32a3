//! Optional file logging for hosts of the handle core.
//!
//! # Responsibility
//! - Start rolling file logs from `CoreConfig` at most once per process.
//! - Route panics through the log before the default hook runs.
//!
//! # Invariants
//! - Events are metadata-only: command names, IDs, counts. Never usernames.
//! - A second start with the same level and directory is a no-op; a
//!   different one is rejected and the running logger is kept.
//! - Nothing here panics, and the core works without a logger.

use crate::config::CoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "handles";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 160;

static FILE_LOGGER: OnceCell<FileLogger> = OnceCell::new();

struct FileLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Level used when `HANDLES_LOG_LEVEL` is unset: `debug` in debug builds,
/// `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts file logging when `config.log_dir` is set.
///
/// Returns `Ok(false)` when the config leaves logging off.
///
/// # Errors
/// - `config.log_level` is not a `log` level name.
/// - `config.log_dir` is relative or cannot be created.
/// - Logging already runs with another level or directory.
pub fn init_logging_from_config(config: &CoreConfig) -> Result<bool, String> {
    let Some(dir) = config.log_dir.as_deref() else {
        return Ok(false);
    };
    let level: LevelFilter = config
        .log_level
        .trim()
        .parse()
        .map_err(|_| format!("unknown log level `{}`", config.log_level))?;
    if !dir.is_absolute() {
        return Err(format!("log dir must be absolute: `{}`", dir.display()));
    }

    let running = FILE_LOGGER.get_or_try_init(|| start(level, dir))?;
    if running.level != level || running.dir != dir {
        return Err(format!(
            "file logging already runs at {} in `{}`; ignoring {} in `{}`",
            running.level,
            running.dir.display(),
            level,
            dir.display()
        ));
    }
    Ok(true)
}

fn start(level: LevelFilter, dir: &Path) -> Result<FileLogger, String> {
    std::fs::create_dir_all(dir)
        .map_err(|err| format!("cannot create log dir `{}`: {err}", dir.display()))?;

    let handle = Logger::with(level)
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start file logger: {err}"))?;

    route_panics_to_log();
    info!(
        "event=logging_init module=core status=ok os={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level
    );

    Ok(FileLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

// Runs once: only reachable from the `FILE_LOGGER` initializer.
fn route_panics_to_log() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(
            "event=panic module=core status=error location={} message={}",
            location,
            one_line(payload, PANIC_MESSAGE_LIMIT)
        );
        previous(panic);
    }));
}

/// Flattens `text` to a single line of at most `limit` characters, since
/// panic messages may quote user input.
fn one_line(text: &str, limit: usize) -> String {
    let mut line: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(limit)
        .collect();
    if text.chars().count() > limit {
        line.push_str("...");
    }
    line
}
