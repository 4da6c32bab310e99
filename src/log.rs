//! Levelled file logging for waveplan.
//!
//! Nothing is written until [`init`] (or [`init_at`]) has been called, so the
//! planner stays free of I/O when used as a library.
//!
//! Levels, most to least severe:
//! - ERROR: a command failed
//! - WARN: input accepted but suspicious (idle agents, zero-length plans)
//! - INFO: config loaded, plan produced
//! - DEBUG: planner stages and per-wave summaries
//! - TRACE: per-assignment slot decisions
//!
//! Debug mode is enabled with `--debug` or `WAVEPLAN_DEBUG=1`. An explicit
//! level can be forced with `WAVEPLAN_LOG=<level>`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Default log file location: `~/.waveplan/waveplan.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waveplan").join("waveplan.log"))
}

/// Initialize logging to the default location.
pub fn init(debug: bool) {
    if let Some(path) = default_log_path() {
        init_at(&path, debug);
    }
}

/// Initialize logging to `path`, truncating it. Later calls keep the first path.
pub fn init_at(path: &Path, debug: bool) {
    set_level(resolve_level(
        debug,
        std::env::var("WAVEPLAN_DEBUG").ok().as_deref(),
        std::env::var("WAVEPLAN_LOG").ok().as_deref(),
    ));

    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let _ = std::fs::write(path, "");
    LOG_PATH.set(path.to_path_buf()).ok();
}

fn resolve_level(debug_flag: bool, debug_env: Option<&str>, level_env: Option<&str>) -> LogLevel {
    if let Some(level) = level_env.and_then(|v| v.parse().ok()) {
        return level;
    }
    let env_debug = debug_env
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if debug_flag || env_debug {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

pub fn get_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Whether a message at `level` would currently be written.
pub fn enabled(level: LogLevel) -> bool {
    LOG_PATH.get().is_some() && level <= get_level()
}

pub fn log_at(level: LogLevel, msg: &str) {
    if !enabled(level) {
        return;
    }

    if let Some(path) = LOG_PATH.get() {
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] [{}] {}", timestamp, level.as_str(), msg);
        }
    }
}

pub fn error(msg: &str) {
    log_at(LogLevel::Error, msg);
}

pub fn warn(msg: &str) {
    log_at(LogLevel::Warn, msg);
}

pub fn info(msg: &str) {
    log_at(LogLevel::Info, msg);
}

pub fn debug(msg: &str) {
    log_at(LogLevel::Debug, msg);
}

pub fn trace(msg: &str) {
    log_at(LogLevel::Trace, msg);
}

/// Log at INFO level.
#[macro_export]
macro_rules! wlog {
    ($($arg:tt)*) => {
        $crate::log::info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! wlog_error {
    ($($arg:tt)*) => {
        $crate::log::error(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! wlog_warn {
    ($($arg:tt)*) => {
        $crate::log::warn(&format!($($arg)*))
    };
}

/// Log at DEBUG level. The message is only formatted when it will be written.
#[macro_export]
macro_rules! wlog_debug {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Debug) {
            $crate::log::debug(&format!($($arg)*))
        }
    };
}

/// Log at TRACE level. The message is only formatted when it will be written.
#[macro_export]
macro_rules! wlog_trace {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogLevel::Trace) {
            $crate::log::trace(&format!($($arg)*))
        }
    };
}
