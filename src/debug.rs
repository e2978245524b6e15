//! Logging bridge for chat-overlay
//!
//! Routes the `log` facade to a debug log file. The level comes from the CLI
//! `--log-level` flag, or else the DEBUG_LEVEL environment variable:
//! - 0 or unset: No logging
//! - 1: Errors only
//! - 2: Info level (startup, config, dropped events)
//! - 3: Debug level (exclusions, evictions, expiries)
//! - 4: Trace level
//!
//! All output goes to chat_overlay_debug.log in the temp directory so stdout
//! stays reserved for render effects. When RUST_LOG is set, records are also
//! mirrored to stderr.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn parse(val: &str) -> Self {
        match val.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_env() -> Self {
        std::env::var("DEBUG_LEVEL")
            .map(|val| Self::parse(&val))
            .unwrap_or(DebugLevel::Off)
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::Off,
            DebugLevel::Error => LevelFilter::Error,
            DebugLevel::Info => LevelFilter::Info,
            DebugLevel::Debug => LevelFilter::Debug,
            DebugLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("chat_overlay_debug.log")
}

struct DebugLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn open(level: LevelFilter) -> Self {
        let file = match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            Ok(mut f) => {
                let _ = f.write_all(
                    format!(
                        "\n{}\nchat-overlay debug session started at {} (level={})\n{}\n",
                        "=".repeat(80),
                        get_timestamp(),
                        level,
                        "=".repeat(80)
                    )
                    .as_bytes(),
                );
                Some(f)
            }
            // Logging must never take the overlay down
            Err(_) => None,
        };
        Self {
            file: Mutex::new(file),
            mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Resolve the effective level: CLI flag, then DEBUG_LEVEL, then off.
pub fn effective_level(cli_level: Option<LevelFilter>) -> LevelFilter {
    cli_level.unwrap_or_else(|| DebugLevel::from_env().to_level_filter())
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Install the logger. Calling it more than once keeps the first logger.
///
/// Returns whether the bridge is active after the call.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) -> bool {
    let level = effective_level(cli_level);
    if level == LevelFilter::Off {
        return LOGGER.get().is_some();
    }
    let mut installed = false;
    let logger = LOGGER.get_or_init(|| {
        installed = true;
        DebugLogger::open(level)
    });
    if installed && log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
    true
}
